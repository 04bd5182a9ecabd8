//! # switch 模块说明
//!
//! 值键开关：抽取判别字段，按字符串或整数键在分发表中挑选子链，
//! 未命中键或字段缺失时落入默认子链。

#[cfg(feature = "std")]
use std::{borrow::Cow, collections::BTreeMap, vec::Vec};

#[cfg(not(feature = "std"))]
use alloc::{borrow::Cow, collections::BTreeMap, vec::Vec};

use manifold_core::{
    ArcPipe, CaseKey, FieldAccess, FieldValue, Next, Pipe, PipeResult, Pipeline, codes, extract,
};

use crate::error::DispatchError;

/// 值键开关管道。
///
/// # 教案式说明
/// - **意图 (Why)**：把"按字段值路由"收敛为查表分发，分发表在构造期固定，
///   执行期只读共享；
/// - **契约 (What)**：
///   - 判别值必须是字符串或整数，否则以
///     [`codes::SWITCH_INVALID_VALUE`](crate::error::codes::SWITCH_INVALID_VALUE) 拒绝；
///   - 键未命中或判别字段缺失时落入默认子链（字段缺失回退是刻意的策略选择，
///     与"抽取失败即报错"相对，保持开关族行为一致）；
///   - 载荷形态不支持抽取等其余抽取错误原样向外传播；
///   - 子链执行后外层 `next` 总会被消费恰好一次；
/// - **执行 (How)**：分发表为 `BTreeMap<CaseKey, Pipeline<T>>`，
///   抽取值折算为 [`CaseKey`] 后查表。
pub struct SwitchPipe<T> {
    field: Cow<'static, str>,
    cases: BTreeMap<CaseKey, Pipeline<T>>,
    fallback: Pipeline<T>,
}

impl<T> SwitchPipe<T> {
    /// 以判别字段、分发表与默认子链构造开关。
    pub fn new(
        field: impl Into<Cow<'static, str>>,
        cases: impl IntoIterator<Item = (CaseKey, Vec<ArcPipe<T>>)>,
        fallback: impl IntoIterator<Item = ArcPipe<T>>,
    ) -> Self {
        Self {
            field: field.into(),
            cases: cases
                .into_iter()
                .map(|(key, pipes)| (key, Pipeline::of(pipes)))
                .collect(),
            fallback: Pipeline::of(fallback),
        }
    }

    fn chain_for(&self, key: &CaseKey) -> &Pipeline<T> {
        self.cases.get(key).unwrap_or(&self.fallback)
    }
}

impl<T> Pipe<T> for SwitchPipe<T>
where
    T: FieldAccess,
{
    fn handle(&self, payload: T, next: Next<'_, T>) -> PipeResult<T> {
        let chain = match extract(&payload, &self.field) {
            Ok(FieldValue::Str(value)) => self.chain_for(&CaseKey::Str(value)),
            Ok(FieldValue::Int(value)) => self.chain_for(&CaseKey::Int(value)),
            Ok(other) => {
                return Err(DispatchError::SwitchValueType {
                    field: self.field.clone().into_owned(),
                    actual: other.type_label(),
                }
                .into());
            }
            Err(err) if err.is(codes::FIELD_MISSING) => &self.fallback,
            Err(err) => return Err(err),
        };

        #[cfg(feature = "std")]
        tracing::trace!(field = %self.field, pipes = chain.len(), "switch dispatch");

        let payload = if chain.is_empty() {
            payload
        } else {
            chain.process(payload)?
        };
        next.run(payload)
    }

    fn describe(&self) -> Cow<'static, str> {
        Cow::Borrowed("switch")
    }
}
