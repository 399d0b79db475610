use super::{preview_request, working_dir_or_current, BatchRequest};
use crate::config::Config;
use crate::output::PreviewOutput;
use anyhow::Result;
use std::path::Path;

/// Preview operation - composes and validates every name, touching nothing
pub fn preview_operation(request: &BatchRequest, working_dir: Option<&Path>) -> Result<PreviewOutput> {
    let base = working_dir_or_current(working_dir)?;
    let config = Config::load_from_dir(&base)?;
    let preview = preview_request(request, &base, &config)?;
    Ok(PreviewOutput { preview })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::{ModuleChain, ModuleSpec};
    use crate::preview::PreviewStatus;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_preview_operation_touches_nothing() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.txt"), "a").unwrap();
        fs::write(temp_dir.path().join("b.txt"), "b").unwrap();

        let request = BatchRequest {
            chain: ModuleChain::new(vec![ModuleSpec::literal("photo_"), ModuleSpec::counter(1, 1, 2)]),
            ..BatchRequest::default()
        };
        let output = preview_operation(&request, Some(temp_dir.path())).unwrap();

        let names: Vec<_> = output.preview.pairs.iter().map(|p| p.new_name.as_str()).collect();
        assert_eq!(names, ["photo_01.txt", "photo_02.txt"]);
        assert!(output.preview.pairs.iter().all(|p| p.status == PreviewStatus::Valid));
        assert!(temp_dir.path().join("a.txt").exists());
        assert!(!temp_dir.path().join(".batchname").exists());
    }

    #[test]
    fn test_preview_operation_respects_portable_config() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.txt"), "a").unwrap();
        fs::create_dir_all(temp_dir.path().join(".batchname")).unwrap();
        fs::write(
            temp_dir.path().join(".batchname").join("config.toml"),
            "[defaults]\nportable_names = false\n",
        )
        .unwrap();

        let request = BatchRequest {
            paths: vec!["a.txt".into()],
            chain: ModuleChain::new(vec![ModuleSpec::literal("what?")]),
            ..BatchRequest::default()
        };
        let output = preview_operation(&request, Some(temp_dir.path())).unwrap();
        assert_eq!(output.preview.pairs[0].status, PreviewStatus::Valid);
    }
}
