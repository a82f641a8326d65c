use crate::math::{mul3, mul_div};
use crate::types::PaymentFrequency;

pub const DAY: u64 = 86_400;
/// Julian year, 365.25 days
pub const YEAR: u64 = 31_557_600;

/// Fixed-point scale of every amortization quantity (8 decimals)
pub const AMORTIZATION_SCALE: i128 = 100_000_000;

/// Accepted deviation between a supplied schedule and `r * (den + 1)`, in basis points
pub const SCHEDULE_TOLERANCE_BPS: i128 = 10;

const BPS: i128 = 10_000;

impl PaymentFrequency {
    /// Period length in seconds, `None` for `NotPayable`
    pub fn period_length(&self) -> Option<u64> {
        match self {
            PaymentFrequency::NotPayable => None,
            PaymentFrequency::Daily => Some(DAY),
            PaymentFrequency::Weekly => Some(7 * DAY),
            PaymentFrequency::Fortnightly => Some(14 * DAY),
            PaymentFrequency::Monthly => Some(YEAR / 12),
            PaymentFrequency::Quarterly => Some(YEAR / 4),
            PaymentFrequency::SemiAnnually => Some(YEAR / 2),
            PaymentFrequency::Annually => Some(YEAR),
        }
    }

    pub fn is_payable(&self) -> bool {
        self.period_length().is_some()
    }
}

/// Index of the period containing `now` for a clock started at `start`.
/// Times before `start` fall in period 0.
pub fn period_index(start: u64, now: u64, frequency: PaymentFrequency) -> Option<u64> {
    let length = frequency.period_length()?;
    Some(now.saturating_sub(start) / length)
}

/// Timestamp at which period `index` begins
pub fn period_start(start: u64, index: u64, frequency: PaymentFrequency) -> Option<u64> {
    let length = frequency.period_length()?;
    index.checked_mul(length)?.checked_add(start)
}

/// Periodic interest rate for an annual percentage, scaled by `AMORTIZATION_SCALE`
///
/// Example: 10% paid monthly gives 833_333 (0.00833333)
pub fn periodic_interest_rate(rate_percent: i128, frequency: PaymentFrequency) -> Option<i128> {
    let length = frequency.period_length()? as i128;
    let scaled = rate_percent.checked_mul(AMORTIZATION_SCALE)?;
    mul_div(scaled, length, 100 * YEAR as i128)
}

/// Number of periods between `start` and `maturity`, scaled by `AMORTIZATION_SCALE`
pub fn loan_term(start: u64, maturity: u64, frequency: PaymentFrequency) -> Option<i128> {
    if maturity <= start {
        return None;
    }
    let length = frequency.period_length()? as i128;
    mul_div((maturity - start) as i128, AMORTIZATION_SCALE, length)
}

/// `(r(1+r)^n, (1+r)^n - 1)` in fixed point for a whole number of periods.
///
/// Uses square-and-multiply so it stays cheap on-chain; owners with a
/// fractional loan term compute the pair off-chain instead.
pub fn amortization_factors(periodic_rate: i128, periods: u32) -> Option<(i128, i128)> {
    if periodic_rate <= 0 || periods == 0 {
        return None;
    }

    let mut base = AMORTIZATION_SCALE.checked_add(periodic_rate)?;
    let mut growth = AMORTIZATION_SCALE;
    let mut exp = periods;
    while exp > 0 {
        if exp & 1 == 1 {
            growth = mul_div(growth, base, AMORTIZATION_SCALE)?;
        }
        exp >>= 1;
        if exp > 0 {
            base = mul_div(base, base, AMORTIZATION_SCALE)?;
        }
    }

    let numerator = mul_div(periodic_rate, growth, AMORTIZATION_SCALE)?;
    let denominator = growth.checked_sub(AMORTIZATION_SCALE)?;
    Some((numerator, denominator))
}

/// `face * numerator / denominator`, scaled by `AMORTIZATION_SCALE`
pub fn periodic_payment(face_value: i128, numerator: i128, denominator: i128) -> Option<i128> {
    if numerator <= 0 || denominator <= 0 {
        return None;
    }
    mul3(face_value, numerator, AMORTIZATION_SCALE)?.checked_div(denominator)
}

/// `r(1+r)^n = r((1+r)^n - 1) + r` holds for every `n`, so a pair that
/// misses it by more than the tolerance cannot come from this rate.
pub fn schedule_is_consistent(periodic_rate: i128, numerator: i128, denominator: i128) -> bool {
    if periodic_rate <= 0 || numerator <= 0 || denominator <= 0 {
        return false;
    }

    let expected = match denominator
        .checked_add(AMORTIZATION_SCALE)
        .and_then(|d| mul_div(periodic_rate, d, AMORTIZATION_SCALE))
    {
        Some(v) => v,
        None => return false,
    };

    let deviation = (numerator - expected).abs();
    match (deviation.checked_mul(BPS), expected.checked_mul(SCHEDULE_TOLERANCE_BPS)) {
        (Some(lhs), Some(rhs)) => lhs <= rhs,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_lengths() {
        assert_eq!(PaymentFrequency::NotPayable.period_length(), None);
        assert_eq!(PaymentFrequency::Daily.period_length(), Some(86_400));
        assert_eq!(PaymentFrequency::Monthly.period_length(), Some(2_629_800));
        assert_eq!(PaymentFrequency::Annually.period_length(), Some(31_557_600));
    }

    #[test]
    fn test_period_index() {
        let start = 1_000;
        assert_eq!(period_index(start, start, PaymentFrequency::Daily), Some(0));
        assert_eq!(period_index(start, start + DAY - 1, PaymentFrequency::Daily), Some(0));
        assert_eq!(period_index(start, start + DAY, PaymentFrequency::Daily), Some(1));
        assert_eq!(period_index(start, 0, PaymentFrequency::Daily), Some(0));
        assert_eq!(period_index(start, start + DAY, PaymentFrequency::NotPayable), None);
        assert_eq!(period_start(start, 3, PaymentFrequency::Weekly), Some(start + 21 * DAY));
    }

    #[test]
    fn test_periodic_rate_monthly() {
        let rate = periodic_interest_rate(10, PaymentFrequency::Monthly).unwrap();
        assert_eq!(rate, 833_333);
    }

    #[test]
    fn test_loan_term_five_years_monthly() {
        let term = loan_term(0, 5 * 31_536_000, PaymentFrequency::Monthly).unwrap();
        // 59.9589 periods
        assert_eq!(term, 5_995_893_223);
        assert_eq!(loan_term(10, 10, PaymentFrequency::Monthly), None);
    }

    #[test]
    fn test_amortization_factors_sixty_months() {
        let rate = periodic_interest_rate(10, PaymentFrequency::Monthly).unwrap();
        let (num, den) = amortization_factors(rate, 60).unwrap();

        assert!(schedule_is_consistent(rate, num, den));

        // 100 borrowed at 10% over 60 whole months: 2.1247 per month
        let payment = periodic_payment(100, num, den).unwrap();
        assert_eq!((payment + AMORTIZATION_SCALE / 200) / (AMORTIZATION_SCALE / 100), 212);
    }

    #[test]
    fn test_schedule_consistency_rejects_tampered_pair() {
        let rate = periodic_interest_rate(10, PaymentFrequency::Monthly).unwrap();
        let (num, den) = amortization_factors(rate, 60).unwrap();

        assert!(!schedule_is_consistent(rate, num * 2, den));
        assert!(!schedule_is_consistent(rate, num, den / 2));
        assert!(!schedule_is_consistent(rate, 0, den));
    }

    #[test]
    fn test_periodic_payment_rejects_zero() {
        assert_eq!(periodic_payment(100, 0, 1), None);
        assert_eq!(periodic_payment(100, 1, 0), None);
    }
}
