/// Formats an amount as US dollars with two decimals and thousands separators.
///
/// Negative amounts keep their sign after the currency symbol (`$-12.50`).
///
/// # Arguments
/// * `amount` - The amount to format.
///
/// # Returns
/// The formatted amount, e.g. `$4,449.46`.
pub fn format_usd(amount: f64) -> String {
    let fixed = format!("{amount:.2}");
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", fixed.as_str()),
    };
    let (int, frac) = digits.split_once('.').unwrap_or((digits, ""));

    let mut out = String::with_capacity(fixed.len() + int.len() / 3 + 1);
    out.push('$');
    out.push_str(sign);
    for (i, ch) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_usd(4449.462), "$4,449.46");
        assert_eq!(format_usd(1_234_567.891), "$1,234,567.89");
        assert_eq!(format_usd(63_770.428), "$63,770.43");
    }

    #[test]
    fn small_amounts_have_no_separator() {
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(7.5), "$7.50");
        assert_eq!(format_usd(100.0), "$100.00");
        assert_eq!(format_usd(999.0), "$999.00");
    }

    #[test]
    fn rounding_can_carry_into_a_new_group() {
        assert_eq!(format_usd(999.999), "$1,000.00");
    }

    #[test]
    fn negative_sign_follows_the_symbol() {
        assert_eq!(format_usd(-12.5), "$-12.50");
        assert_eq!(format_usd(-1234.5), "$-1,234.50");
    }
}
