use colored::Colorize;

use crate::currency::format_usd;
use crate::ledger::CategorySpend;

const BAR_WIDTH: usize = 24;

/// Renders the per-category spend bars shown on the dashboard, widest share
/// first. The caller passes the annual total so shares match the stat tiles.
pub fn render_breakdown(grouped: &[CategorySpend], total_annual: f64, plain: bool) -> Vec<String> {
    let label_width = grouped
        .iter()
        .map(|entry| entry.category.label().chars().count())
        .max()
        .unwrap_or(0);

    grouped
        .iter()
        .map(|entry| {
            let share = if total_annual > 0.0 {
                entry.annual_total / total_annual
            } else {
                0.0
            };
            let filled = ((share * BAR_WIDTH as f64).round() as usize).clamp(1, BAR_WIDTH);
            let percent = (share * 100.0).round() as i64;
            let amount = format_usd(entry.annual_total);

            if plain {
                format!(
                    "{:<label_width$}  {}{}  {}/yr ({}%)",
                    entry.category.label(),
                    "#".repeat(filled),
                    " ".repeat(BAR_WIDTH - filled),
                    amount,
                    percent,
                )
            } else {
                let (r, g, b) = entry.category.color();
                let bar = "█".repeat(filled).truecolor(r, g, b).to_string();
                let rest = "░".repeat(BAR_WIDTH - filled);
                format!(
                    "{} {:<label_width$}  {}{}  {}/yr ({}%)",
                    entry.category.icon().truecolor(r, g, b),
                    entry.category.label(),
                    bar,
                    rest,
                    amount,
                    percent,
                )
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Category, CategorySpend};

    fn grouped() -> Vec<CategorySpend> {
        vec![
            CategorySpend {
                category: Category::Streaming,
                annual_total: 300.0,
            },
            CategorySpend {
                category: Category::Music,
                annual_total: 100.0,
            },
        ]
    }

    #[test]
    fn plain_bars_scale_with_share() {
        let lines = render_breakdown(&grouped(), 400.0, true);
        assert_eq!(lines.len(), 2);
        let first = lines[0].matches('#').count();
        let second = lines[1].matches('#').count();
        assert_eq!(first, 18); // 75% of 24
        assert_eq!(second, 6); // 25% of 24
    }

    #[test]
    fn lines_carry_label_amount_and_share() {
        let lines = render_breakdown(&grouped(), 400.0, true);
        assert!(lines[0].contains("Streaming"));
        assert!(lines[0].contains("$300.00/yr"));
        assert!(lines[0].contains("(75%)"));
    }

    #[test]
    fn tiny_shares_still_draw_one_mark() {
        let grouped = vec![
            CategorySpend {
                category: Category::Cloud,
                annual_total: 1.0,
            },
            CategorySpend {
                category: Category::Other,
                annual_total: 999.0,
            },
        ];
        let lines = render_breakdown(&grouped, 1000.0, true);
        assert_eq!(lines[0].matches('#').count(), 1);
    }

    #[test]
    fn empty_grouping_renders_nothing() {
        assert!(render_breakdown(&[], 0.0, true).is_empty());
    }
}
