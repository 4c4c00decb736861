//! Output formatting utilities

use crate::application::Stats;
use crate::domain::carpentry::QuickCalc;
use crate::infrastructure::settings::currency_symbol;

/// Format record counts for display
pub fn format_stats(stats: &Stats) -> String {
    format!(
        "Journal entries:   {}\n\
         Reflections:       {}\n\
         Transactions:      {}\n\
         Projects:          {}\n\
         Lumber calcs:      {}\n\
         Last modified:     {}\n",
        stats.journal_entries,
        stats.reflections,
        stats.transactions,
        stats.projects,
        stats.lumber_calcs,
        stats.last_modified.format("%Y-%m-%d %H:%M:%S"),
    )
}

/// Format a quick calculation the way the Quick Calc tab shows it
pub fn format_calc(calc: &QuickCalc, currency: &str) -> String {
    let symbol = currency_symbol(currency);
    format!(
        "{}\n\
         Unit price:            {}{:.2}\n\
         Quantity:              {}\n\
         Quantity (with {}% waste): {}\n\
         Total cost:            {}{:.2}\n",
        calc.product.name,
        symbol,
        calc.product.price,
        calc.quantity,
        calc.waste_percent,
        calc.adjusted_quantity,
        symbol,
        calc.total_cost,
    )
}

/// Format `key = value` lines for `config --list`
pub fn format_config_list(entries: &[(String, String)]) -> String {
    let mut output = String::new();
    for (key, value) in entries {
        output.push_str(&format!("{} = {}\n", key, value));
    }
    output
}
