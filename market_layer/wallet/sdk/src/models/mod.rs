//   Copyright 2024 The EMI Market Developers
//   SPDX-License-Identifier: BSD-3-Clause

mod emi_plan;
pub use emi_plan::EmiPlan;

mod product;
pub use product::Product;

mod schedule;
pub use schedule::{InstallmentSchedule, ScheduleError};
