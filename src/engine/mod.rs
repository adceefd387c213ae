// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod binding;
pub mod handle;
pub mod join_table;
pub mod merge;
pub mod record;
pub mod subscription;

pub use binding::{MergePlan, OutputShape, SourceBinding, SourceIdentity};
pub use handle::{merge, MergeHandle, MergeOutcome};
pub use join_table::{Group, JoinTable};
pub use merge::{MergeEngine, MergeState, SourceEvent, SourceSignal, Step};
pub use record::{MergeEvent, MergedRecord, MissingReport, PartialGroup, Slots};
