//! 常用导出集合，供 `use manifold_core::prelude::*;` 一次引入装配所需的名字。

pub use crate::contract::{
    ArcPipe, Flow, FnPipe, Next, Pipe, PipeResult, TransformPipe, arc_pipe, pipe_fn,
};
pub use crate::error::{PipelineError, codes};
pub use crate::extract::{CaseEnum, CaseKey, EnumTag, FieldAccess, FieldValue, extract};
pub use crate::pipeline::{PipeEntry, PipeResolver, Pipeline};
