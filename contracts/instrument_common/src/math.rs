/// `a * b`, `None` on overflow
pub fn mul(a: i128, b: i128) -> Option<i128> {
    a.checked_mul(b)
}

/// `a * b * c`
pub fn mul3(a: i128, b: i128, c: i128) -> Option<i128> {
    a.checked_mul(b)?.checked_mul(c)
}

/// `a * b / d`, `None` on overflow or a zero divisor
pub fn mul_div(a: i128, b: i128, d: i128) -> Option<i128> {
    if d == 0 {
        return None;
    }
    a.checked_mul(b)?.checked_div(d)
}

/// Sum of a sequence of amounts
pub fn checked_sum<I: IntoIterator<Item = i128>>(amounts: I) -> Option<i128> {
    amounts
        .into_iter()
        .try_fold(0i128, |acc, amount| acc.checked_add(amount))
}
