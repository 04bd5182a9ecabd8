//! # enum_switch 模块说明
//!
//! 封闭集开关：判别值必须是某个值背书枚举的成员，以其后备标量查表分发。
//! 与值键开关的差别在于判别值多了一层类型归属校验，分发键在构造期
//! 即被约束为同一枚举类型的成员。

#[cfg(feature = "std")]
use std::{borrow::Cow, collections::BTreeMap, vec::Vec};

#[cfg(not(feature = "std"))]
use alloc::{borrow::Cow, collections::BTreeMap, vec::Vec};

use core::any::TypeId;

use manifold_core::{
    ArcPipe, CaseEnum, CaseKey, FieldAccess, FieldValue, Next, Pipe, PipeResult, Pipeline,
    PipelineError, codes, extract,
};

use crate::error::DispatchError;

/// 构造期锁定的期望枚举类型。
#[derive(Debug)]
struct ExpectedEnum {
    type_id: TypeId,
    type_name: &'static str,
}

/// 封闭集开关管道。
///
/// # 教案式说明
/// - **意图 (Why)**：离散状态建模为值背书枚举时，分发表应当以枚举成员为键，
///   杜绝"裸标量写错一个字符"这类静默失配；
/// - **契约 (What)**：
///   - 判别字段缺失时落入默认子链（与值键开关一致的刻意策略）；
///   - 判别值不是枚举成员，或属于另一个枚举类型，以
///     [`codes::ENUM_INVALID_VALUE`](crate::error::codes::ENUM_INVALID_VALUE) 拒绝；
///   - 后备标量未命中任何分发键时落入默认子链；
///   - 子链执行后外层 `next` 总会被消费恰好一次；
/// - **使用 (How)**：[`EnumSwitchPipe::with_cases`] 以枚举成员直接建表，
///   键的合法性由类型系统保证；[`EnumSwitchPipe::new`] 接受运行期拼装的
///   字段值作为键，非枚举键或混用多个枚举类型以
///   [`codes::ENUM_INVALID_CASE`](crate::error::codes::ENUM_INVALID_CASE) 拒绝。
pub struct EnumSwitchPipe<T> {
    field: Cow<'static, str>,
    expected: Option<ExpectedEnum>,
    cases: BTreeMap<CaseKey, Pipeline<T>>,
    fallback: Pipeline<T>,
}

impl<T> core::fmt::Debug for EnumSwitchPipe<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EnumSwitchPipe")
            .field("field", &self.field)
            .field("expected", &self.expected)
            .field("cases", &self.cases)
            .field("fallback", &self.fallback)
            .finish()
    }
}

impl<T> EnumSwitchPipe<T> {
    /// 以枚举成员为分发键建表，键合法性在编译期保证。
    pub fn with_cases<E: CaseEnum>(
        field: impl Into<Cow<'static, str>>,
        cases: impl IntoIterator<Item = (E, Vec<ArcPipe<T>>)>,
        fallback: impl IntoIterator<Item = ArcPipe<T>>,
    ) -> Self {
        Self {
            field: field.into(),
            expected: Some(ExpectedEnum {
                type_id: TypeId::of::<E>(),
                type_name: core::any::type_name::<E>(),
            }),
            cases: cases
                .into_iter()
                .map(|(case, pipes)| (case.case_key(), Pipeline::of(pipes)))
                .collect(),
            fallback: Pipeline::of(fallback),
        }
    }

    /// 以运行期拼装的字段值为分发键建表。
    ///
    /// 每个键必须是 [`FieldValue::Case`]，且所有键属于同一枚举类型；
    /// 违约在构造期即被拒绝，不会拖延到分发时刻。
    pub fn new(
        field: impl Into<Cow<'static, str>>,
        cases: impl IntoIterator<Item = (FieldValue, Vec<ArcPipe<T>>)>,
        fallback: impl IntoIterator<Item = ArcPipe<T>>,
    ) -> Result<Self, PipelineError> {
        let mut expected: Option<ExpectedEnum> = None;
        let mut table = BTreeMap::new();

        for (key, pipes) in cases {
            let tag = match key {
                FieldValue::Case(tag) => tag,
                other => {
                    return Err(DispatchError::CaseKeyType {
                        actual: other.type_label(),
                    }
                    .into());
                }
            };

            match &expected {
                None => {
                    expected = Some(ExpectedEnum {
                        type_id: tag.type_id(),
                        type_name: tag.type_name(),
                    });
                }
                Some(seen) if seen.type_id != tag.type_id() => {
                    return Err(DispatchError::CaseKeyMixed {
                        expected: seen.type_name,
                        actual: tag.type_name(),
                    }
                    .into());
                }
                Some(_) => {}
            }

            table.insert(tag.key().clone(), Pipeline::of(pipes));
        }

        Ok(Self {
            field: field.into(),
            expected,
            cases: table,
            fallback: Pipeline::of(fallback),
        })
    }
}

impl<T> Pipe<T> for EnumSwitchPipe<T>
where
    T: FieldAccess,
{
    fn handle(&self, payload: T, next: Next<'_, T>) -> PipeResult<T> {
        let chain = match extract(&payload, &self.field) {
            Ok(FieldValue::Case(tag)) => {
                if let Some(expected) = &self.expected {
                    if expected.type_id != tag.type_id() {
                        return Err(DispatchError::EnumTypeMismatch {
                            field: self.field.clone().into_owned(),
                            expected: expected.type_name,
                            actual: tag.type_name(),
                        }
                        .into());
                    }
                }
                self.cases.get(tag.key()).unwrap_or(&self.fallback)
            }
            Ok(other) => {
                return Err(DispatchError::NotAnEnum {
                    field: self.field.clone().into_owned(),
                    actual: other.type_label(),
                }
                .into());
            }
            Err(err) if err.is(codes::FIELD_MISSING) => &self.fallback,
            Err(err) => return Err(err),
        };

        #[cfg(feature = "std")]
        tracing::trace!(field = %self.field, pipes = chain.len(), "enum switch dispatch");

        let payload = if chain.is_empty() {
            payload
        } else {
            chain.process(payload)?
        };
        next.run(payload)
    }

    fn describe(&self) -> Cow<'static, str> {
        Cow::Borrowed("enum-switch")
    }
}
