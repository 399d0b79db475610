#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod case_model;
pub mod compose;
pub mod config;
pub mod execute;
pub mod file_record;
pub mod history;
pub mod id_resolver;
pub mod interrupt;
pub mod lock;
pub mod modules;
pub mod operations;
pub mod output;
pub mod preview;
pub mod provider;
pub mod transliterate;
pub mod undo;
pub mod validate;

pub use case_model::{parse_to_tokens, to_style, transform, CaseStyle, SeparatorStyle, Token, TokenModel};
pub use compose::{compose, compose_with_metadata};
pub use config::{Config, ConflictPolicy};
pub use execute::{
    detect_case_insensitive_fs, execute, execute_pairs, execute_preview, ConflictAction, ConflictPrompt,
    ExecutionReport, FixedPolicy, OutcomeState, RenameOutcome, SkipReason,
};
pub use file_record::{scan_files, FileRecord, ScanError, ScanOptions};
pub use history::{
    format_history, HistoryManager, HistoryStore, JsonHistoryStore, MemoryHistoryStore, RenameBatch,
    RenamePair,
};
pub use id_resolver::{resolve_id, ResolveError};
pub use lock::LockFile;
pub use modules::{
    CounterSpec, MetadataCategory, ModuleChain, ModuleSpec, PostTransform, RemovalScope,
};
pub use operations::{
    history_operation, preview_operation, rename_operation, status_operation, undo_operation,
    BatchRequest,
};
pub use output::{
    HistoryResult, LastOperation, OutputFormat, OutputFormatter, PreviewOutput, RenameResult,
    StatusResult, VersionResult,
};
pub use preview::{
    build_preview, render_preview, should_use_color, write_preview, Preview, PreviewPair, PreviewResult,
    PreviewStatus,
};
pub use provider::{FsMetadataProvider, MapMetadataProvider, Metadata, MetadataProvider, NoMetadata};
pub use undo::{UndoCheck, UndoResult};
pub use validate::{DefaultValidator, FilenameValidator, NameError};
