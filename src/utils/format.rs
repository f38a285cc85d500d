fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn format_int_with_comma(n: i64) -> String {
    let grouped = group_thousands(&n.unsigned_abs().to_string());
    if n < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Formats with `decimals` fractional digits and a thousands separator on the
/// integer part.
pub fn format_float_with_comma(f: f64, decimals: usize) -> String {
    let s = format!("{:.*}", decimals, f.abs());
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (s.as_str(), None),
    };
    let sign = if f.is_sign_negative() && s.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(d) => format!("{}{}.{}", sign, group_thousands(int_part), d),
        None => format!("{}{}", sign, group_thousands(int_part)),
    }
}
