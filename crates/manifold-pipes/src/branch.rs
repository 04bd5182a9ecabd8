//! # branch 模块说明
//!
//! 无条件二元分支：按谓词挑选真假两条子链之一，子链跑完后恢复外层链路。
//! 分支本身从不终止外层链路；只有子链内部的短路管道才会提前结束子链。

#[cfg(feature = "std")]
use std::{borrow::Cow, boxed::Box};

#[cfg(not(feature = "std"))]
use alloc::{borrow::Cow, boxed::Box};

use manifold_core::{ArcPipe, Next, Pipe, PipeResult, Pipeline};

/// 二元分支管道。
///
/// # 教案式说明
/// - **意图 (Why)**：把"条件成立走 A 链、否则走 B 链"收敛为一个标准管道，
///   调用方不必在业务管道里手写分叉；
/// - **契约 (What)**：
///   - 谓词在每次 `handle` 中恰好求值一次；
///   - 选中的子链非空时以当前载荷驱动，其结果成为新载荷；
///   - 无论是否走了子链，外层 `next` 总会被消费恰好一次；
/// - **执行 (How)**：两条子链在构造期装配为独立引擎，执行期只读复用；
///   子链内的终止信号由子链自己的 `process` 边界吸收，不会越级终止外层。
pub struct BranchPipe<T> {
    condition: Box<dyn Fn(&T) -> bool + Send + Sync>,
    on_true: Pipeline<T>,
    on_false: Pipeline<T>,
}

impl<T> BranchPipe<T> {
    /// 以谓词与真假两条子链清单构造分支。
    pub fn new(
        condition: impl Fn(&T) -> bool + Send + Sync + 'static,
        on_true: impl IntoIterator<Item = ArcPipe<T>>,
        on_false: impl IntoIterator<Item = ArcPipe<T>>,
    ) -> Self {
        Self {
            condition: Box::new(condition),
            on_true: Pipeline::of(on_true),
            on_false: Pipeline::of(on_false),
        }
    }
}

impl<T> Pipe<T> for BranchPipe<T> {
    fn handle(&self, payload: T, next: Next<'_, T>) -> PipeResult<T> {
        let taken = (self.condition)(&payload);
        let chain = if taken { &self.on_true } else { &self.on_false };

        #[cfg(feature = "std")]
        tracing::trace!(taken, pipes = chain.len(), "branch dispatch");

        let payload = if chain.is_empty() {
            payload
        } else {
            chain.process(payload)?
        };
        next.run(payload)
    }

    fn describe(&self) -> Cow<'static, str> {
        Cow::Borrowed("branch")
    }
}
