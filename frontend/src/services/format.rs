use shared::Provider;

/// Two decimals with thousands separators, e.g. `$12,345.60`
pub fn format_currency(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

/// Display name of a provider id; unknown ids are shown as-is
pub fn provider_name(providers: &[Provider], provider_id: Option<&str>) -> String {
    match provider_id {
        None => "Sin proveedor".to_string(),
        Some(id) => providers
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.to_string()),
    }
}
