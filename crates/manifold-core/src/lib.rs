#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]

//! # manifold-core
//!
//! ## 定位与职责（Why）
//! - 提供可组合处理链的核心三件套：管道契约（[`Pipe`]）、同步执行引擎
//!   （[`Pipeline`]）与跨形态字段抽取（[`extract`]）；
//! - 调用方以有序清单装配独立处理单元，引擎把清单折叠为单条延续驱动执行；
//!   每个管道自行决定变换载荷、驱动嵌套子链、提前终止或原样放行；
//! - 条件分派管道族（分支、开关、多路、短路）位于 `manifold-pipes`，
//!   在本 crate 契约之上装配。
//!
//! ## 架构嵌入（Where）
//! - `contract` 模块定义管道与延续契约及终止信号；
//! - `pipeline` 模块承载引擎与清单编辑操作，并定义名字解析协作方契约；
//! - `extract` 模块在封闭的载荷形态集合上做字段抽取；
//! - `error` 模块集中声明稳定错误码与统一错误载体。
//!
//! ## Feature 策略（Trade-offs）
//! - `std`（默认）启用 `tracing` 观测点与基于 `std` 集合的载荷实现；
//! - `alloc` 为受限运行时保留核心契约的可编译性，纯无分配器环境不在支持范围；
//! - `json` 追加 `serde_json` 载荷集成，JSON 文档可直接作为链路载荷。
//!
//! ## 并发模型（What）
//! - 单次 `process` 同步执行，嵌套链路同步跑完后外层才继续；
//! - 管道实例与清单是构造期固定的只读配置，同一 [`Pipeline`] 可服务多线程
//!   并发的独立 `process` 调用，前提是结构性编辑不与执行并发。

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod contract;
pub mod error;
pub mod extract;
#[cfg(feature = "json")]
pub mod json;
pub mod pipeline;
pub mod prelude;

pub use contract::{ArcPipe, Flow, FnPipe, Next, Pipe, PipeResult, TransformPipe, arc_pipe, pipe_fn};
pub use error::{PipelineError, codes};
pub use extract::{
    CaseEnum, CaseKey, EnumTag, FieldAccess, FieldValue, GetterKind, IndexedAccess, KeyedAccess,
    PayloadShape, StructuredAccess, extract,
};
pub use pipeline::{PipeEntry, PipeResolver, Pipeline};
