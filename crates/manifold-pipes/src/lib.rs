#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]

//! # manifold-pipes
//!
//! ## 定位与职责（Why）
//! - 在 `manifold-core` 的管道契约之上提供条件分派管道族：二元分支、值键开关、
//!   封闭集开关、有序多谓词分派与短路终止；
//! - 每个分派管道内部以独立引擎驱动选中的子链，子链跑完后恢复外层链路，
//!   分派本身从不终止外层（短路管道除外，提前退出正是它的职责）。
//!
//! ## 架构嵌入（Where）
//! - `branch` / `switch` / `enum_switch` / `multibranch` / `short_circuit`
//!   各承载一种分派形态；
//! - `error` 模块集中定义分派域校验错误，统一转换为核心错误载体。
//!
//! ## Feature 策略（Trade-offs）
//! - `std`（默认）启用 `thiserror` 派生与 `tracing` 观测点；
//! - `alloc` 轨道保持与核心一致的受限运行时可编译性。

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod branch;
pub mod enum_switch;
pub mod error;
pub mod multibranch;
pub mod short_circuit;
pub mod switch;

pub use branch::BranchPipe;
pub use enum_switch::EnumSwitchPipe;
pub use error::DispatchError;
pub use multibranch::{BranchArm, BranchCondition, MatchMode, MultibranchPipe};
pub use short_circuit::ShortCircuitPipe;
pub use switch::SwitchPipe;
