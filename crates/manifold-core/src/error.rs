//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 为管道装配与执行路径提供集中定义的稳定错误域：装配错误（非法管道清单、锚点缺失）
//!   与抽取错误（字段缺失、载荷形态不支持）都在此归档；
//! - 错误码承载稳定语义，日志、指标与上层的自动化处置策略只依赖错误码，不解析消息文本。
//!
//! ## 设计要求（What）
//! - 所有错误在违约点同步抛出，核心不做重试或内部恢复：它们是装配者的编程错误，
//!   必须立即浮出水面；
//! - 管道自定义实现抛出的错误原样穿透引擎，`process` 不包裹、不翻译；
//! - 终止信号不属于错误域：它是控制流原语，由 [`crate::contract::Flow::Stop`] 表达，
//!   在引擎边界转换为正常结果。
//!
//! ## 扩展建议（How）
//! - 下游 crate 应定义自己的细粒度错误枚举，并通过 `From` 转换为 [`PipelineError`]，
//!   转换时从自身的码表挑选稳定错误码（参见 `manifold-pipes` 的做法）。

#[cfg(feature = "std")]
use std::{borrow::Cow, string::String};

#[cfg(not(feature = "std"))]
use alloc::{borrow::Cow, string::String};

use core::fmt;

/// 稳定错误码清单，命名遵循 `<域>.<语义>` 约定。
///
/// # 教案式说明
/// - **意图 (Why)**：调用方与测试以错误码为判定依据，消息文本可以演进而码值不变；
/// - **契约 (What)**：所有码值为 `'static` 字符串，新增码值属于兼容变更，改动既有码值属于破坏性变更。
pub mod codes {
    /// 管道清单中出现无法受理的条目（如在未挂接解析器时传入命名条目）。
    pub const PIPES_INVALID: &str = "pipeline.pipes.invalid";
    /// `insert_before` / `insert_after` 按同一性查找锚点失败。
    pub const ANCHOR_MISSING: &str = "pipeline.anchor.missing";
    /// 字段抽取未在载荷中命中目标字段。
    pub const FIELD_MISSING: &str = "extract.field.missing";
    /// 载荷形态不支持字段抽取（如原始标量）。
    pub const SHAPE_UNSUPPORTED: &str = "extract.shape.unsupported";
}

/// 管道域的统一错误载体：稳定错误码加排障消息。
///
/// # 教案式说明
/// - **意图 (Why)**：装配错误与执行错误合流为同一形态，`handle` 与 `process` 的签名
///   才能保持单一错误类型，`?` 传播不需要中间转换；
/// - **契约 (What)**：
///   - `code` 为 `'static` 稳定错误码，语义见 [`codes`]；
///   - `message` 面向排障人员，不应包含敏感信息；
///   - 类型满足 `Send + Sync + 'static`，可安全跨线程传播；
/// - **设计取舍 (Trade-offs)**：消息采用 `Cow<'static, str>`，静态文案零分配，
///   动态拼装仅付出一次堆分配。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PipelineError {
    code: &'static str,
    message: Cow<'static, str>,
}

impl PipelineError {
    /// 使用稳定错误码与消息构造错误。
    pub fn new(code: &'static str, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// 获取稳定错误码，供日志聚合与断言使用。
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// 获取人类可读的错误描述。
    pub fn message(&self) -> &str {
        self.message.as_ref()
    }

    /// 判断错误是否属于指定错误码。
    pub fn is(&self, code: &str) -> bool {
        self.code == code
    }

    /// 将消息替换为带上下文的新文案，错误码保持不变。
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Cow::Owned(message.into());
        self
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PipelineError {}
