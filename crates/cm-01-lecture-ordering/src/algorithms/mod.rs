//! Algorithms module for Lecture Ordering
//!
//! Contains:
//! - Shift planner (move, append and removal plans)
//! - Renumbering for reconciliation

pub mod renumber;
pub mod shift_planner;

pub use renumber::renumber;
pub use shift_planner::{
    plan_append, plan_move_across_sections, plan_move_within_section, plan_removal,
};
