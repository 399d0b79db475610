use anyhow::Result;
use batchname_core::{BatchRequest, ModuleChain, ScanOptions};

use crate::cli::{ChainArgs, FileArgs};
use crate::error::CliError;

/// Combine `--chain`, `--module`, `--case` and `--separator` into one chain.
///
/// Modules given with `--module` come after the ones of the chain file, and
/// `--case`/`--separator` override its post transform.
pub fn build_chain(args: &ChainArgs) -> Result<ModuleChain> {
    let mut chain = match &args.chain {
        Some(path) => ModuleChain::load(path).map_err(|e| CliError::InvalidInput(format!("{e:#}")))?,
        None => ModuleChain::default(),
    };

    chain.modules.extend(args.modules.iter().map(|m| m.0.clone()));
    if let Some(case) = args.case {
        chain.post_transform.case = case.into();
    }
    if let Some(separator) = args.separator {
        chain.post_transform.separator = separator.into();
    }

    if args.chain.is_none() && chain.modules.is_empty() && chain.post_transform.is_noop() {
        return Err(CliError::InvalidInput(
            "No modules given. Use --module, --chain, --case or --separator".to_string(),
        )
        .into());
    }

    Ok(chain)
}

pub fn build_request(files: &FileArgs, chain: &ChainArgs) -> Result<BatchRequest> {
    Ok(BatchRequest {
        paths: files.paths.clone(),
        scan: ScanOptions {
            includes: files.include.clone(),
            excludes: files.exclude.clone(),
            recursive: files.recursive,
            hidden: files.hidden,
        },
        chain: build_chain(chain)?,
    })
}
