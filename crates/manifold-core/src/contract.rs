//! # contract 模块说明
//!
//! ## 角色定位（Why）
//! - 定义处理链的最小能力契约：[`Pipe`] 是单个处理单元，[`Next`] 是"链路余下部分"的延续，
//!   [`Flow`] 是穿越整条链路的控制流结果；
//! - 引擎、条件分派管道与调用方自定义管道都只依赖这一层，契约稳定则全家桶可独立演进。
//!
//! ## 契约说明（What）
//! - 合规的 `handle` 实现最终要么恰好消费一次 `next`，要么返回 [`Flow::Stop`] 提前终止；
//!   `next` 以值传入且只能被消费一次，"多次调用"在类型层面即不可表达；
//! - 不消费 `next` 也不终止属于违约：返回值会被当作链路已走完的结果回流，
//!   该行为属于实现细节，调用方不得依赖；
//! - 管道实例相对载荷无状态：构造期固定的配置（谓词、子链清单）在并发执行间只读共享。
//!
//! ## 设计取舍（Trade-offs）
//! - 延续采用 `Box<dyn FnOnce>` 而非具名递归结构，换取"消费即失效"的静态保障，
//!   代价是每次 `process` 为每个管道付出一次堆分配；同步调用链下该成本可忽略。

#[cfg(feature = "std")]
use std::{borrow::Cow, boxed::Box, sync::Arc};

#[cfg(not(feature = "std"))]
use alloc::{borrow::Cow, boxed::Box, sync::Arc};

use crate::error::PipelineError;

/// `handle` 与延续的统一返回形态。
pub type PipeResult<T> = Result<Flow<T>, PipelineError>;

/// 链路控制流结果：继续传递或携带最终载荷提前终止。
///
/// # 教案式说明
/// - **意图 (Why)**：终止信号用显式的结果和类型表达，而非异常或 panic；
///   信号在最近一层引擎的 `process` 边界被吸收，转换为正常返回值；
/// - **契约 (What)**：`Stop` 恰好携带一个载荷；除引擎的 `process` 外，
///   任何中间层都应原样向外传递 `Stop`，不得擅自拆包；
/// - **风险 (Trade-offs)**：`#[must_use]` 防止调用方静默丢弃终止语义。
#[must_use = "Flow 承载链路控制语义，丢弃将遗失终止信号"]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Flow<T> {
    /// 载荷继续沿链路传递。
    Continue(T),
    /// 链路被要求立即终止，携带最终载荷。
    Stop(T),
}

impl<T> Flow<T> {
    /// 取出内部载荷，抹平控制流差异。
    pub fn into_payload(self) -> T {
        match self {
            Flow::Continue(payload) | Flow::Stop(payload) => payload,
        }
    }

    /// 是否为终止信号。
    pub fn is_stop(&self) -> bool {
        matches!(self, Flow::Stop(_))
    }
}

/// 延续：代表"当前管道之后的整条剩余链路"。
///
/// # 教案式说明
/// - **意图 (Why)**：管道通过消费延续决定是否放行载荷；延续按值传递，
///   消费后即失效，从类型上排除"重复调用剩余链路"这类违约；
/// - **契约 (What)**：每次 `process` 都会重新折叠出一条延续，延续从不跨调用持久化；
/// - **使用 (How)**：自定义管道在变换载荷后调用 [`Next::run`]；
///   测试桩可用 [`Next::identity`] 或 [`Next::new`] 构造探针延续。
pub struct Next<'chain, T> {
    run: Box<dyn FnOnce(T) -> PipeResult<T> + 'chain>,
}

impl<'chain, T> Next<'chain, T> {
    /// 从闭包构造延续，主要供引擎折叠与测试桩使用。
    pub fn new(run: impl FnOnce(T) -> PipeResult<T> + 'chain) -> Self {
        Self { run: Box::new(run) }
    }

    /// 恒等延续：链尾基例，原样放行载荷。
    pub fn identity() -> Self {
        Self::new(|payload| Ok(Flow::Continue(payload)))
    }

    /// 消费延续，驱动剩余链路处理载荷。
    pub fn run(self, payload: T) -> PipeResult<T> {
        (self.run)(payload)
    }
}

/// 处理链中的单个处理单元。
///
/// # 教案式说明
/// - **意图 (Why)**：以对象安全的最小契约统一普通变换、条件分派与注册表适配等所有变体；
/// - **契约 (What)**：
///   - 实现必须 `Send + Sync`，同一实例可在并发的独立执行间复用；
///   - `handle` 接收载荷所有权，最终要么恰好消费一次 `next`，要么返回 [`Flow::Stop`]；
///   - 实现持有的配置在构造期固定，执行期不得出现针对单次调用的可变状态；
/// - **风险 (Trade-offs)**：契约不约束实现内部再驱动嵌套引擎，嵌套执行同步完成后
///   才允许消费外层 `next`。
pub trait Pipe<T>: Send + Sync {
    /// 处理载荷并决定链路走向。
    fn handle(&self, payload: T, next: Next<'_, T>) -> PipeResult<T>;

    /// 诊断用标签，默认取实现类型名。
    fn describe(&self) -> Cow<'static, str> {
        Cow::Borrowed(core::any::type_name::<Self>())
    }
}

/// 共享管道句柄：链路清单中的标准存放形态。
pub type ArcPipe<T> = Arc<dyn Pipe<T>>;

/// 将具体管道装入共享句柄。
pub fn arc_pipe<T, P>(pipe: P) -> ArcPipe<T>
where
    P: Pipe<T> + 'static,
{
    Arc::new(pipe)
}

/// 普通变换管道：对载荷应用一个纯变换后放行。
///
/// # 教案式说明
/// - **意图 (Why)**：绝大多数业务步骤只是"变换后继续"，提供标准载体避免每处手写样板；
/// - **契约 (What)**：变换为构造期固定的一等闭包值，对单次调用无副作用状态；
/// - **使用 (How)**：`TransformPipe::labeled` 可附加诊断标签，便于日志与锚点排障。
pub struct TransformPipe<T> {
    transform: Box<dyn Fn(T) -> T + Send + Sync>,
    label: Cow<'static, str>,
}

impl<T> TransformPipe<T> {
    /// 从变换闭包构造管道。
    pub fn new(transform: impl Fn(T) -> T + Send + Sync + 'static) -> Self {
        Self::labeled("transform", transform)
    }

    /// 构造带诊断标签的变换管道。
    pub fn labeled(
        label: impl Into<Cow<'static, str>>,
        transform: impl Fn(T) -> T + Send + Sync + 'static,
    ) -> Self {
        Self {
            transform: Box::new(transform),
            label: label.into(),
        }
    }
}

impl<T> Pipe<T> for TransformPipe<T> {
    fn handle(&self, payload: T, next: Next<'_, T>) -> PipeResult<T> {
        next.run((self.transform)(payload))
    }

    fn describe(&self) -> Cow<'static, str> {
        self.label.clone()
    }
}

/// 闭包管道适配器：把符合 `handle` 形状的函数直接当作管道使用。
pub struct FnPipe<F> {
    handler: F,
}

/// 从函数构造管道，适合测试桩与一次性粘合逻辑。
pub fn pipe_fn<T, F>(handler: F) -> FnPipe<F>
where
    F: for<'chain> Fn(T, Next<'chain, T>) -> PipeResult<T> + Send + Sync,
{
    FnPipe { handler }
}

impl<T, F> Pipe<T> for FnPipe<F>
where
    F: for<'chain> Fn(T, Next<'chain, T>) -> PipeResult<T> + Send + Sync,
{
    fn handle(&self, payload: T, next: Next<'_, T>) -> PipeResult<T> {
        (self.handler)(payload, next)
    }

    fn describe(&self) -> Cow<'static, str> {
        Cow::Borrowed("fn-pipe")
    }
}
