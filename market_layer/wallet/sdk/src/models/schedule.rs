//   Copyright 2024 The EMI Market Developers
//   SPDX-License-Identifier: BSD-3-Clause

use emi_market_common_types::Amount;

/// Splits a product price into a fixed number of monthly installments using
/// exact base-unit arithmetic.
///
/// Rounding rule: the monthly installment is the price divided by the tenure,
/// rounded down; the division remainder is absorbed into the final
/// installment. The schedule therefore never over-collects before the last
/// payment and the installments always sum to the price exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallmentSchedule {
    price: Amount,
    tenure_months: u32,
    monthly_installment: Amount,
    final_installment: Amount,
}

impl InstallmentSchedule {
    pub fn split(price: Amount, tenure_months: u32) -> Result<Self, ScheduleError> {
        if tenure_months == 0 {
            return Err(ScheduleError::ZeroTenure);
        }
        let tenure = u128::from(tenure_months);
        // checked_div cannot fail for tenure >= 1, but stay in checked arithmetic
        let monthly_installment = price.checked_div(tenure).ok_or(ScheduleError::Overflow)?;
        let remainder = price.checked_rem(tenure).ok_or(ScheduleError::Overflow)?;
        let final_installment = monthly_installment
            .checked_add(remainder)
            .ok_or(ScheduleError::Overflow)?;

        Ok(Self {
            price,
            tenure_months,
            monthly_installment,
            final_installment,
        })
    }

    pub fn price(&self) -> Amount {
        self.price
    }

    pub fn tenure_months(&self) -> u32 {
        self.tenure_months
    }

    pub fn monthly_installment(&self) -> Amount {
        self.monthly_installment
    }

    pub fn final_installment(&self) -> Amount {
        self.final_installment
    }

    /// The amount due for a 1-based month number, or `None` out of range.
    pub fn installment_for(&self, month: u32) -> Option<Amount> {
        if month == 0 || month > self.tenure_months {
            return None;
        }
        if month == self.tenure_months {
            Some(self.final_installment)
        } else {
            Some(self.monthly_installment)
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Tenure must be at least one month")]
    ZeroTenure,
    #[error("Schedule arithmetic overflowed")]
    Overflow,
}
