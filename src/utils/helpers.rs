pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// `AbCd...WxYz` for keys longer than eight characters.
pub fn shorten_pubkey(pubkey: &str) -> String {
    let len = pubkey.chars().count();
    if len <= 8 {
        return pubkey.to_string();
    }
    let prefix: String = pubkey.chars().take(4).collect();
    let suffix: String = pubkey.chars().skip(len - 4).collect();
    format!("{}...{}", prefix, suffix)
}

/// Lamports as SOL with two decimals and thousands separators.
pub fn format_sol(lamports: u64) -> String {
    let hundredths = (lamports as u128 + (LAMPORTS_PER_SOL / 200) as u128) / (LAMPORTS_PER_SOL / 100) as u128;
    format!("{}.{:02}", group_thousands(hundredths / 100), hundredths % 100)
}

pub fn format_commission(commission: f64) -> String {
    format!("{:.2}", commission)
}

fn group_thousands(value: u128) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
