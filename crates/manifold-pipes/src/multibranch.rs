//! # multibranch 模块说明
//!
//! 有序多谓词分派：依序检视各分支条目，谓词命中即驱动其子链。
//! 首中即止模式在第一次命中后停止扫描；全量匹配模式继续走完清单，
//! 每次命中的输出载荷成为后续谓词的输入。

#[cfg(feature = "std")]
use std::{borrow::Cow, boxed::Box, vec::Vec};

#[cfg(not(feature = "std"))]
use alloc::{borrow::Cow, boxed::Box, vec::Vec};

use manifold_core::{ArcPipe, Next, Pipe, PipeResult, Pipeline, PipelineError};

use crate::error::DispatchError;

/// 分支谓词的存放形态。
pub type BranchCondition<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// 多谓词分派的扫描模式。
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MatchMode {
    /// 首中即止：第一个命中的分支之后不再扫描。
    FirstMatch,
    /// 全量匹配：走完整张清单，命中输出逐级前馈。
    AllMatches,
}

/// 单个分支条目的装配器。
///
/// 条目在运行期拼装，谓词与子链清单都可能缺席；完整性校验集中在
/// [`MultibranchPipe::new`]，残缺条目不会悄悄滑进分派表。
pub struct BranchArm<T> {
    condition: Option<BranchCondition<T>>,
    pipes: Option<Vec<ArcPipe<T>>>,
}

impl<T> BranchArm<T> {
    /// 构造空条目。
    pub fn new() -> Self {
        Self {
            condition: None,
            pipes: None,
        }
    }

    /// 配置谓词。
    pub fn when(mut self, condition: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.condition = Some(Box::new(condition));
        self
    }

    /// 配置命中后驱动的子链清单。
    pub fn through(mut self, pipes: impl IntoIterator<Item = ArcPipe<T>>) -> Self {
        self.pipes = Some(pipes.into_iter().collect());
        self
    }
}

impl<T> Default for BranchArm<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// 有序多谓词分派管道。
///
/// # 教案式说明
/// - **意图 (Why)**：一组互不排斥的路由规则按声明顺序求值，
///   调用方选择"只命中一条"还是"逐条套用"；
/// - **契约 (What)**：
///   - 条目缺谓词或缺子链清单时，构造以
///     [`codes::MULTIBRANCH_MALFORMED`](crate::error::codes::MULTIBRANCH_MALFORMED) 拒绝；
///   - 谓词按清单顺序对"当前载荷"求值：全量匹配模式下前一条命中分支的输出
///     就是后一条谓词的输入；
///   - 无论命中与否，扫描结束后外层 `next` 总会被消费恰好一次。
pub struct MultibranchPipe<T> {
    arms: Vec<(BranchCondition<T>, Pipeline<T>)>,
    mode: MatchMode,
}

impl<T> core::fmt::Debug for MultibranchPipe<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MultibranchPipe")
            .field("arms", &self.arms.len())
            .field("mode", &self.mode)
            .finish()
    }
}

impl<T> MultibranchPipe<T> {
    /// 校验并装配分支清单。
    pub fn new(
        arms: impl IntoIterator<Item = BranchArm<T>>,
        mode: MatchMode,
    ) -> Result<Self, PipelineError> {
        let mut assembled = Vec::new();
        for (index, arm) in arms.into_iter().enumerate() {
            match (arm.condition, arm.pipes) {
                (Some(condition), Some(pipes)) => {
                    assembled.push((condition, Pipeline::of(pipes)));
                }
                _ => return Err(DispatchError::ArmIncomplete { index }.into()),
            }
        }
        Ok(Self {
            arms: assembled,
            mode,
        })
    }
}

impl<T> Pipe<T> for MultibranchPipe<T> {
    fn handle(&self, mut payload: T, next: Next<'_, T>) -> PipeResult<T> {
        for (condition, chain) in &self.arms {
            if condition(&payload) {
                payload = if chain.is_empty() {
                    payload
                } else {
                    chain.process(payload)?
                };
                if self.mode == MatchMode::FirstMatch {
                    break;
                }
            }
        }
        next.run(payload)
    }

    fn describe(&self) -> Cow<'static, str> {
        Cow::Borrowed("multibranch")
    }
}
