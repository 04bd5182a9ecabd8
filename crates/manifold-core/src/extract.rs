//! # extract 模块说明
//!
//! ## 角色定位（Why）
//! - 条件分派管道需要从"形态不定"的载荷中读出判别字段；本模块把这件事收敛为
//!   一个纯函数 [`extract`]，在封闭的载荷形态集合上做显式标签分发；
//! - 形态集合刻意封闭（映射、索引容器、结构化对象、不可抽取），不做开放式反射，
//!   每种形态有各自的抽取策略与失败语义。
//!
//! ## 契约说明（What）
//! - 解析顺序由载荷自报的 [`PayloadShape`] 决定：
//!   1. 键值映射：按键直接查找；
//!   2. 索引容器：先做存在性检查再取值；
//!   3. 结构化对象：同名属性优先，其后依次尝试 `get_<field>`、`is_<field>`、
//!      `has_<field>` 风格的取值通道（这是一条刻意受限的命名约定，由实现方映射，
//!      不涉及运行期反射）；
//! - 未命中字段返回 [`codes::FIELD_MISSING`](crate::error::codes::FIELD_MISSING)，
//!   载荷形态不支持抽取返回
//!   [`codes::SHAPE_UNSUPPORTED`](crate::error::codes::SHAPE_UNSUPPORTED)；
//! - 抽取纯粹且无副作用，可在并发执行间任意调用。
//!
//! ## 设计取舍（Trade-offs）
//! - 字段值统一收敛为 [`FieldValue`] 封闭集合：判别逻辑只面对有限形态，
//!   嵌套结构以 [`FieldValue::Composite`] 占位，留给上层决定是否视为非法判别值。

#[cfg(feature = "std")]
use std::{
    collections::{BTreeMap, HashMap},
    format,
    string::String,
    vec::Vec,
};

#[cfg(not(feature = "std"))]
use alloc::{collections::BTreeMap, format, string::String, vec::Vec};

use core::any::TypeId;

use crate::error::{PipelineError, codes};

/// 抽取结果的封闭值集合。
///
/// # 教案式说明
/// - **意图 (Why)**：判别字段只需要标量语义；收敛为封闭枚举后，
///   开关类管道可以对"非法判别值"给出精确错误而非静默失配；
/// - **契约 (What)**：`Case` 携带值背书枚举的类型标识与后备标量；
///   `Composite` 表示字段存在但为嵌套结构，核心不展开其内容。
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    /// 空值。
    Null,
    /// 布尔值。
    Bool(bool),
    /// 有符号整数。
    Int(i64),
    /// 浮点数。
    Float(f64),
    /// 字符串。
    Str(String),
    /// 值背书枚举的实例标识。
    Case(EnumTag),
    /// 嵌套结构占位：字段存在，但不是可判别的标量。
    Composite,
}

impl FieldValue {
    /// 形态标签，用于错误消息。
    pub fn type_label(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "bool",
            FieldValue::Int(_) => "int",
            FieldValue::Float(_) => "float",
            FieldValue::Str(_) => "string",
            FieldValue::Case(_) => "enum case",
            FieldValue::Composite => "composite",
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Str(String::from(value))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Str(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

/// 开关分发使用的后备标量键：字符串或整数。
#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum CaseKey {
    /// 整数键。
    Int(i64),
    /// 字符串键。
    Str(String),
}

impl From<&str> for CaseKey {
    fn from(value: &str) -> Self {
        CaseKey::Str(String::from(value))
    }
}

impl From<String> for CaseKey {
    fn from(value: String) -> Self {
        CaseKey::Str(value)
    }
}

impl From<i64> for CaseKey {
    fn from(value: i64) -> Self {
        CaseKey::Int(value)
    }
}

/// 值背书枚举实例的标识：类型同一性加后备标量。
///
/// # 教案式说明
/// - **意图 (Why)**：枚举开关要求判别值属于某个封闭的枚举类型；`TypeId`
///   承载类型同一性判定，类型名只服务于错误消息；
/// - **契约 (What)**：相等性按 `TypeId` 与后备键共同判定，两个不同枚举类型
///   即便后备标量相同也互不相等。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnumTag {
    type_id: TypeId,
    type_name: &'static str,
    key: CaseKey,
}

impl EnumTag {
    /// 为指定枚举类型构造标识。
    pub fn of<E: CaseEnum>(key: CaseKey) -> Self {
        Self {
            type_id: TypeId::of::<E>(),
            type_name: core::any::type_name::<E>(),
            key,
        }
    }

    /// 枚举类型的同一性标识。
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// 枚举类型名，仅用于诊断输出。
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// 后备标量键。
    pub fn key(&self) -> &CaseKey {
        &self.key
    }
}

/// 值背书枚举能力：封闭枚举类型为每个成员报告一个后备标量。
///
/// # 教案式说明
/// - **意图 (Why)**：枚举开关按后备标量建立分发表，枚举成员与标量键的映射
///   由类型自身声明，调用方不需要手工维护两套常量；
/// - **使用 (How)**：业务枚举实现 [`CaseEnum::case_key`] 后，即可通过
///   [`CaseEnum::field_value`] 写入载荷字段，或作为开关的类型化分发键。
pub trait CaseEnum: 'static {
    /// 当前成员的后备标量。
    fn case_key(&self) -> CaseKey;

    /// 当前成员的完整标识。
    fn tag(&self) -> EnumTag
    where
        Self: Sized,
    {
        EnumTag::of::<Self>(self.case_key())
    }

    /// 以字段值形态表达当前成员，便于写入载荷。
    fn field_value(&self) -> FieldValue
    where
        Self: Sized,
    {
        FieldValue::Case(self.tag())
    }
}

/// 键值映射形态的抽取通道。
pub trait KeyedAccess {
    /// 按键查找条目。
    fn entry(&self, key: &str) -> Option<FieldValue>;
}

/// 支持存在性检查的索引访问形态。
pub trait IndexedAccess {
    /// 判断索引是否存在。
    fn has_index(&self, index: &str) -> bool;

    /// 取出索引位置的值。
    fn at_index(&self, index: &str) -> Option<FieldValue>;
}

/// 结构化对象的取值通道类别。
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GetterKind {
    /// `get_<field>` 风格。
    Get,
    /// `is_<field>` 风格。
    Is,
    /// `has_<field>` 风格。
    Has,
}

/// 结构化对象形态的抽取通道。
///
/// 实现方负责把字段名映射到自身的属性或取值方法；`getter` 的默认实现返回
/// `None`，只声明属性通道的对象无需关心取值方法约定。
pub trait StructuredAccess {
    /// 同名属性通道。
    fn property(&self, name: &str) -> Option<FieldValue>;

    /// 取值方法通道，按 [`GetterKind`] 区分命名风格。
    fn getter(&self, kind: GetterKind, name: &str) -> Option<FieldValue> {
        let _ = (kind, name);
        None
    }
}

/// 载荷形态的封闭集合。
pub enum PayloadShape<'a> {
    /// 键值映射。
    Keyed(&'a dyn KeyedAccess),
    /// 索引容器。
    Indexed(&'a dyn IndexedAccess),
    /// 带属性或取值方法的结构化对象。
    Structured(&'a dyn StructuredAccess),
    /// 不支持字段抽取的形态（原始标量等）。
    Opaque,
}

/// 可参与字段抽取的载荷能力：自报所属形态。
pub trait FieldAccess {
    /// 当前载荷呈现的形态。
    fn shape(&self) -> PayloadShape<'_>;
}

/// 从载荷中抽取命名字段。
///
/// # 教案式说明
/// - **契约 (What)**：按 [`PayloadShape`] 分发到对应抽取策略；未命中字段返回
///   `extract.field.missing`，形态不支持返回 `extract.shape.unsupported`；
/// - **执行 (How)**：结构化对象依序尝试属性、`get_`、`is_`、`has_` 四条通道，
///   命中即返回，全部落空按字段缺失处理。
pub fn extract<P>(payload: &P, field: &str) -> Result<FieldValue, PipelineError>
where
    P: FieldAccess + ?Sized,
{
    match payload.shape() {
        PayloadShape::Keyed(map) => map.entry(field).ok_or_else(|| missing(field, "keyed map")),
        PayloadShape::Indexed(seq) => {
            if seq.has_index(field) {
                seq.at_index(field)
                    .ok_or_else(|| missing(field, "indexed container"))
            } else {
                Err(missing(field, "indexed container"))
            }
        }
        PayloadShape::Structured(object) => object
            .property(field)
            .or_else(|| object.getter(GetterKind::Get, field))
            .or_else(|| object.getter(GetterKind::Is, field))
            .or_else(|| object.getter(GetterKind::Has, field))
            .ok_or_else(|| missing(field, "structured object")),
        PayloadShape::Opaque => Err(PipelineError::new(
            codes::SHAPE_UNSUPPORTED,
            format!(
                "cannot extract field `{field}` from payload of type `{}`",
                core::any::type_name::<P>()
            ),
        )),
    }
}

fn missing(field: &str, shape: &str) -> PipelineError {
    PipelineError::new(
        codes::FIELD_MISSING,
        format!("field `{field}` is not present in the payload ({shape})"),
    )
}

impl KeyedAccess for BTreeMap<String, FieldValue> {
    fn entry(&self, key: &str) -> Option<FieldValue> {
        self.get(key).cloned()
    }
}

impl FieldAccess for BTreeMap<String, FieldValue> {
    fn shape(&self) -> PayloadShape<'_> {
        PayloadShape::Keyed(self)
    }
}

#[cfg(feature = "std")]
impl KeyedAccess for HashMap<String, FieldValue> {
    fn entry(&self, key: &str) -> Option<FieldValue> {
        self.get(key).cloned()
    }
}

#[cfg(feature = "std")]
impl FieldAccess for HashMap<String, FieldValue> {
    fn shape(&self) -> PayloadShape<'_> {
        PayloadShape::Keyed(self)
    }
}

impl IndexedAccess for Vec<FieldValue> {
    fn has_index(&self, index: &str) -> bool {
        index
            .parse::<usize>()
            .map(|position| position < self.len())
            .unwrap_or(false)
    }

    fn at_index(&self, index: &str) -> Option<FieldValue> {
        index
            .parse::<usize>()
            .ok()
            .and_then(|position| self.get(position).cloned())
    }
}

impl FieldAccess for Vec<FieldValue> {
    fn shape(&self) -> PayloadShape<'_> {
        PayloadShape::Indexed(self)
    }
}
