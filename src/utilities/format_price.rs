use std::sync::LazyLock;

use regex::Regex;

pub const DEFAULT_CURRENCY: &str = "$";
const NOT_AVAILABLE: &str = "N/A";

static NON_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.\-]+").expect("static pattern"));

// Longest prefix a lenient float parser accepts once everything but digits,
// dots and minus signs is gone.
static NUMERIC_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?(?:[0-9]+\.?[0-9]*|\.[0-9]+)").expect("static pattern"));

/// Formats a scraped price string as `currency` followed by two decimals.
///
/// Empty input and the `N/A` sentinel come back as `N/A`. Anything that does
/// not start with a number once stripped is returned untouched.
///
/// ```
/// use price_compare_ui::utilities::format_price::format_price;
///
/// assert_eq!(format_price("$12.5", "$"), "$12.50");
/// assert_eq!(format_price("abc", "$"), "abc");
/// ```
pub fn format_price(price: &str, currency: &str) -> String {
    if price.is_empty() || price == NOT_AVAILABLE {
        return NOT_AVAILABLE.to_string();
    }

    match parse_lenient(price) {
        Some(value) => format!("{}{}", currency, to_fixed_2(value)),
        None => price.to_string(),
    }
}

/// Strips currency noise and parses the longest numeric prefix.
pub fn parse_lenient(price: &str) -> Option<f64> {
    let stripped = NON_NUMERIC.replace_all(price, "");
    let prefix = NUMERIC_PREFIX.find(&stripped)?;

    prefix.as_str().parse::<f64>().ok()
}

/// Fixed two-decimal rendering of the exact binary value.
///
/// Exact halves round away from zero. The only doubles sitting exactly on a
/// half cent are odd multiples of 1/8, so those are rounded up by hand and
/// everything else goes through the regular formatter.
fn to_fixed_2(value: f64) -> String {
    if value.is_infinite() {
        return if value < 0.0 { "-Infinity" } else { "Infinity" }.to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let magnitude = value.abs();

    if magnitude >= 1e21 {
        return format!("{}{}", sign, exponent_form(magnitude));
    }

    let eighths = magnitude * 8.0;
    if eighths.fract() == 0.0 && eighths % 2.0 == 1.0 {
        // magnitude * 100 = 25n/2 with n odd, so the tie rounds up to (25n + 1)/2.
        let n = eighths as u128;
        let cents = (25 * n + 1) / 2;
        return format!("{}{}.{:02}", sign, cents / 100, cents % 100);
    }

    format!("{}{:.2}", sign, magnitude)
}

fn exponent_form(magnitude: f64) -> String {
    let rendered = format!("{:e}", magnitude);
    match rendered.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => rendered,
    }
}

/// Formatter bound to the configured currency symbol.
#[derive(Debug, Clone)]
pub struct PriceFormatter {
    currency: String,
}

impl PriceFormatter {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
        }
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn format(&self, price: &str) -> String {
        format_price(price, &self.currency)
    }
}

impl Default for PriceFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_sentinel_are_not_available() {
        assert_eq!(format_price("", "$"), "N/A");
        assert_eq!(format_price("N/A", "$"), "N/A");
        assert_eq!(PriceFormatter::default().format("N/A"), "N/A");
    }

    #[test]
    fn pads_to_two_decimals() {
        assert_eq!(format_price("$12.5", "$"), "$12.50");
        assert_eq!(format_price("12", "$"), "$12.00");
        assert_eq!(format_price("$1,049.99", "$"), "$1049.99");
        assert_eq!(format_price("USD 7.", "€"), "€7.00");
    }

    #[test]
    fn unparsable_input_is_returned_unchanged() {
        assert_eq!(format_price("abc", "$"), "abc");
        assert_eq!(format_price("See price in cart", "$"), "See price in cart");
        assert_eq!(format_price("-", "$"), "-");
        assert_eq!(format_price("..5", "$"), "..5");
    }

    #[test]
    fn parsing_stops_at_the_first_invalid_character() {
        assert_eq!(format_price("1.2.3", "$"), "$1.20");
        assert_eq!(format_price("12-5", "$"), "$12.00");
        assert_eq!(format_price("Rs. 4500", "$"), "$0.45");
        assert_eq!(format_price("--5", "$"), "--5");
    }

    #[test]
    fn negative_values_keep_their_sign() {
        assert_eq!(format_price("-3.456", "$"), "$-3.46");
        assert_eq!(format_price("-0", "$"), "$0.00");
        assert_eq!(format_price("-0.001", "$"), "$-0.00");
    }

    #[test]
    fn exact_halves_round_away_from_zero() {
        assert_eq!(format_price("0.125", "$"), "$0.13");
        assert_eq!(format_price("2.375", "$"), "$2.38");
        assert_eq!(format_price("-0.625", "$"), "$-0.63");
        assert_eq!(format_price("100000000000000.125", "$"), "$100000000000000.13");
        assert_eq!(format_price("70368744177664.125", "$"), "$70368744177664.13");
        // 1.005 is stored just below the half
        assert_eq!(format_price("1.005", "$"), "$1.00");
    }

    #[test]
    fn huge_values_switch_to_exponent_form() {
        assert_eq!(format_price("1000000000000000000000", "$"), "$1e+21");
        assert_eq!(format_price(&"9".repeat(400), "$"), "$Infinity");
    }

    #[test]
    fn formatter_uses_its_currency() {
        let formatter = PriceFormatter::new("Rs. ");
        assert_eq!(formatter.currency(), "Rs. ");
        assert_eq!(formatter.format("4500"), "Rs. 4500.00");
    }
}
