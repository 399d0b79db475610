use crate::file_record::FileRecord;
use crate::modules::{Fragment, ModuleChain, ModuleContext, ModuleSpec};
use crate::provider::Metadata;
use tracing::debug;

/// Compose the candidate file name for `file` at position `index`.
///
/// Uses the metadata already attached to the record.
pub fn compose(chain: &ModuleChain, file: &FileRecord, index: usize) -> String {
    compose_with_metadata(chain, file, index, file.metadata.as_ref())
}

/// Same as [`compose`] but with metadata supplied by the caller.
pub fn compose_with_metadata(
    chain: &ModuleChain,
    file: &FileRecord,
    index: usize,
    metadata: Option<&Metadata>,
) -> String {
    let original = file.base_name();
    let ctx = ModuleContext {
        base_name: original,
        index,
        metadata,
    };

    let base = if chain.modules.is_empty() {
        original.to_string()
    } else {
        compose_fragments(&chain.modules, &ctx)
    };

    let base = if chain.post_transform.is_noop() {
        base
    } else {
        let transformed = chain.post_transform.apply(&base);
        if transformed.trim().is_empty() {
            original.to_string()
        } else {
            transformed
        }
    };

    let name = join_extension(&base, &file.extension);
    debug!(old = %file.current_name, new = %name, index, "composed name");
    name
}

fn compose_fragments(modules: &[ModuleSpec], ctx: &ModuleContext<'_>) -> String {
    let mut fragments: Vec<String> = Vec::with_capacity(modules.len());

    for (position, module) in modules.iter().enumerate() {
        match module.render(ctx) {
            Fragment::Text(text) => fragments.push(text),
            Fragment::NotEffective => {
                // A blank literal only stands in for the name when it leads the chain
                let falls_back = match module {
                    ModuleSpec::LiteralText { .. } => position == 0,
                    _ => true,
                };
                if falls_back && fragments.is_empty() {
                    fragments.push(ctx.base_name.to_string());
                }
            },
        }
    }

    fragments.concat()
}

/// Append `extension` with a single dot when it is not empty
pub fn join_extension(base: &str, extension: &str) -> String {
    if extension.is_empty() {
        base.to_string()
    } else {
        format!("{}.{}", base, extension)
    }
}
