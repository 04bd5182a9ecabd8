//! # pipeline 模块说明
//!
//! ## 角色定位（Why）
//! - [`Pipeline`] 是执行引擎：持有有序管道清单，把清单折叠为单条延续并驱动执行；
//! - 清单的结构性编辑（整体替换、追加、按锚点拼接）全部集中在这里，
//!   编辑与执行的时序约束因此只需要在一处表述。
//!
//! ## 契约说明（What）
//! - 清单顺序即调用顺序：首个管道最先接触载荷，也最后沿延续把结果送回；
//! - 清单允许重复条目；锚点按同一性（实例指针或条目名字）查找，
//!   两个结构相同的管道实例仍然是不同锚点；
//! - `process(&self)` 是唯一执行入口且可重入：分派管道在 `handle` 内驱动的
//!   嵌套引擎同步跑完后外层才继续；
//! - 结构性编辑要求 `&mut self`，单线程下与执行互斥由借用检查器保证；
//!   跨线程共享同一实例时，调用方必须保证编辑不与执行并发。
//!
//! ## 执行逻辑（How）
//! - `process` 先把命名条目经解析器换成实例，再自尾向首折叠：基例为恒等延续，
//!   每步把累计的延续包为左侧管道的 `next`；
//! - 折叠产物以初始载荷驱动；任何一层返回 [`Flow::Stop`]，信号都在本次
//!   `process` 的边界被吸收并作为正常结果返回，绝不越过该边界继续向外传播。

#[cfg(feature = "std")]
use std::{borrow::Cow, format, sync::Arc, vec::Vec};

#[cfg(not(feature = "std"))]
use alloc::{borrow::Cow, format, sync::Arc, vec::Vec};

use core::fmt;

use crate::contract::{ArcPipe, Flow, Next};
use crate::error::{PipelineError, codes};

/// 名字到管道实例的解析能力，由外部注册表协作方实现。
///
/// # 教案式说明
/// - **意图 (Why)**：调用方可能以名字引用尚未实例化的管道；引擎在组装延续前
///   通过该能力把名字换成实例，注册表的具体形态不进入核心；
/// - **契约 (What)**：解析失败时返回协作方自定义的错误，引擎原样透传，不做包裹。
pub trait PipeResolver<T>: Send + Sync {
    /// 把名字解析为管道实例。
    fn resolve(&self, id: &str) -> Result<ArcPipe<T>, PipelineError>;
}

/// 清单条目：已实例化的管道，或待解析的名字。
pub enum PipeEntry<T> {
    /// 实例条目。
    Instance(ArcPipe<T>),
    /// 命名条目，执行前经 [`PipeResolver`] 解析。
    Named(Cow<'static, str>),
}

impl<T> PipeEntry<T> {
    /// 包装实例条目。
    pub fn instance(pipe: ArcPipe<T>) -> Self {
        PipeEntry::Instance(pipe)
    }

    /// 构造命名条目。
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        PipeEntry::Named(name.into())
    }

    /// 诊断用标签。
    pub fn describe(&self) -> Cow<'static, str> {
        match self {
            PipeEntry::Instance(pipe) => pipe.describe(),
            PipeEntry::Named(name) => name.clone(),
        }
    }

    /// 同一性判定：实例比较指针，命名条目比较名字。
    fn matches(&self, anchor: &PipeEntry<T>) -> bool {
        match (self, anchor) {
            (PipeEntry::Instance(own), PipeEntry::Instance(other)) => Arc::ptr_eq(own, other),
            (PipeEntry::Named(own), PipeEntry::Named(other)) => own == other,
            _ => false,
        }
    }
}

impl<T> Clone for PipeEntry<T> {
    fn clone(&self) -> Self {
        match self {
            PipeEntry::Instance(pipe) => PipeEntry::Instance(Arc::clone(pipe)),
            PipeEntry::Named(name) => PipeEntry::Named(name.clone()),
        }
    }
}

impl<T> fmt::Debug for PipeEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipeEntry::Instance(pipe) => f.debug_tuple("Instance").field(&pipe.describe()).finish(),
            PipeEntry::Named(name) => f.debug_tuple("Named").field(name).finish(),
        }
    }
}

impl<T> From<ArcPipe<T>> for PipeEntry<T> {
    fn from(pipe: ArcPipe<T>) -> Self {
        PipeEntry::Instance(pipe)
    }
}

impl<T> From<&'static str> for PipeEntry<T> {
    fn from(name: &'static str) -> Self {
        PipeEntry::Named(Cow::Borrowed(name))
    }
}

/// 执行引擎：有序管道清单加可选解析器。
pub struct Pipeline<T> {
    entries: Vec<PipeEntry<T>>,
    resolver: Option<Arc<dyn PipeResolver<T>>>,
}

impl<T> Default for Pipeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Pipeline<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            resolver: self.resolver.clone(),
        }
    }
}

impl<T> fmt::Debug for Pipeline<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("entries", &self.entries)
            .field("resolver", &self.resolver.as_ref().map(|_| "<resolver>"))
            .finish()
    }
}

impl<T> Pipeline<T> {
    /// 构造空引擎。
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            resolver: None,
        }
    }

    /// 构造挂接了解析器的空引擎。解析器必须先于命名条目就位，
    /// 否则命名条目在受理时即被拒绝。
    pub fn with_resolver(resolver: Arc<dyn PipeResolver<T>>) -> Self {
        Self {
            entries: Vec::new(),
            resolver: Some(resolver),
        }
    }

    /// 从实例清单直接构造，供装配子链等纯实例场景使用。
    pub fn of(pipes: impl IntoIterator<Item = ArcPipe<T>>) -> Self {
        Self {
            entries: pipes.into_iter().map(PipeEntry::Instance).collect(),
            resolver: None,
        }
    }

    /// 整体替换清单。
    ///
    /// 受理即校验：未挂接解析器时出现命名条目，立刻以
    /// [`codes::PIPES_INVALID`] 拒绝，原清单保持不变。
    pub fn via(
        &mut self,
        entries: impl IntoIterator<Item = PipeEntry<T>>,
    ) -> Result<&mut Self, PipelineError> {
        let entries = self.admit(entries.into_iter().collect())?;
        self.entries = entries;
        Ok(self)
    }

    /// 在清单尾部追加条目。
    pub fn append(
        &mut self,
        entries: impl IntoIterator<Item = PipeEntry<T>>,
    ) -> Result<&mut Self, PipelineError> {
        let mut entries = self.admit(entries.into_iter().collect())?;
        self.entries.append(&mut entries);
        Ok(self)
    }

    /// 在清单头部插入条目，新条目整体保持给定顺序。
    pub fn prepend(
        &mut self,
        entries: impl IntoIterator<Item = PipeEntry<T>>,
    ) -> Result<&mut Self, PipelineError> {
        let mut entries = self.admit(entries.into_iter().collect())?;
        entries.extend(self.entries.drain(..));
        self.entries = entries;
        Ok(self)
    }

    /// 在锚点之前拼接条目。
    ///
    /// 锚点按同一性查找（参见 [`PipeEntry`]）；未命中时返回
    /// [`codes::ANCHOR_MISSING`]，清单保持原状。
    pub fn insert_before(
        &mut self,
        anchor: &PipeEntry<T>,
        entries: impl IntoIterator<Item = PipeEntry<T>>,
    ) -> Result<&mut Self, PipelineError> {
        let entries = self.admit(entries.into_iter().collect())?;
        let index = self.position_of(anchor)?;
        self.entries.splice(index..index, entries);
        Ok(self)
    }

    /// 在锚点之后拼接条目。
    pub fn insert_after(
        &mut self,
        anchor: &PipeEntry<T>,
        entries: impl IntoIterator<Item = PipeEntry<T>>,
    ) -> Result<&mut Self, PipelineError> {
        let entries = self.admit(entries.into_iter().collect())?;
        let index = self.position_of(anchor)? + 1;
        self.entries.splice(index..index, entries);
        Ok(self)
    }

    /// 清空清单。
    pub fn clear(&mut self) -> &mut Self {
        self.entries.clear();
        self
    }

    /// 清单长度。
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 清单是否为空。
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 清单快照访问器。外部协作方（如包装既有清单的注册表适配层）
    /// 一律经由此读取，引擎内部状态不向任何人开洞。
    pub fn entries(&self) -> &[PipeEntry<T>] {
        &self.entries
    }

    /// 执行入口：以载荷驱动整条链路。
    ///
    /// # 教案式说明
    /// - **契约 (What)**：空清单恒等返回输入；[`Flow::Stop`] 在本边界被吸收，
    ///   其携带载荷即是返回值；管道抛出的错误原样向外传播；
    /// - **执行 (How)**：解析命名条目之后自尾向首折叠延续，再以载荷驱动；
    ///   嵌套引擎的 `process` 各自吸收各自的终止信号，互不越界。
    pub fn process(&self, payload: T) -> Result<T, PipelineError> {
        let pipes = self.resolved()?;

        #[cfg(feature = "std")]
        tracing::trace!(pipes = pipes.len(), "composing pipeline continuation");

        let chain = pipes.iter().rev().fold(Next::identity(), |next, pipe| {
            Next::new(move |payload| pipe.handle(payload, next))
        });

        match chain.run(payload)? {
            Flow::Continue(payload) => Ok(payload),
            Flow::Stop(payload) => {
                #[cfg(feature = "std")]
                tracing::trace!("termination signal absorbed at process boundary");
                Ok(payload)
            }
        }
    }

    /// 受理校验：命名条目要求解析器已就位。
    fn admit(&self, entries: Vec<PipeEntry<T>>) -> Result<Vec<PipeEntry<T>>, PipelineError> {
        if self.resolver.is_none() {
            if let Some(named) = entries
                .iter()
                .find(|entry| matches!(entry, PipeEntry::Named(_)))
            {
                return Err(PipelineError::new(
                    codes::PIPES_INVALID,
                    format!(
                        "named entry `{}` requires a resolver to be attached first",
                        named.describe()
                    ),
                ));
            }
        }
        Ok(entries)
    }

    fn position_of(&self, anchor: &PipeEntry<T>) -> Result<usize, PipelineError> {
        self.entries
            .iter()
            .position(|entry| entry.matches(anchor))
            .ok_or_else(|| {
                PipelineError::new(
                    codes::ANCHOR_MISSING,
                    format!(
                        "anchor pipe `{}` is not part of this pipeline",
                        anchor.describe()
                    ),
                )
            })
    }

    fn resolved(&self) -> Result<Vec<ArcPipe<T>>, PipelineError> {
        let mut pipes = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            match entry {
                PipeEntry::Instance(pipe) => pipes.push(Arc::clone(pipe)),
                PipeEntry::Named(name) => match &self.resolver {
                    Some(resolver) => pipes.push(resolver.resolve(name)?),
                    None => {
                        return Err(PipelineError::new(
                            codes::PIPES_INVALID,
                            format!("named entry `{name}` has no resolver to resolve it"),
                        ));
                    }
                },
            }
        }
        Ok(pipes)
    }
}
