use rust_decimal::{Decimal, RoundingStrategy};

/// Flat-rate monthly installment: `(P + P × r/100 × n) / n`, half-up to 2 decimals.
///
/// `monthly_rate_pct` is the flat interest per month in percent. `None` for a non-positive term.
pub fn monthly_installment(
    principal: Decimal,
    term_months: i32,
    monthly_rate_pct: Decimal,
) -> Option<Decimal> {
    if term_months <= 0 {
        return None;
    }

    let months = Decimal::from(term_months);
    let interest = principal * monthly_rate_pct / Decimal::ONE_HUNDRED * months;
    let total = principal + interest;

    Some((total / months).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}
