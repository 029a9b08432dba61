use crate::report::{ReportContext, format_f64_6, fraction, median, p10, p90};

pub fn render_report_text(ctx: &ReportContext) -> String {
    let mut out = String::new();

    out.push_str(&format!("{} ({})\n", ctx.title, ctx.chart));
    out.push_str(&"=".repeat(ctx.title.len() + ctx.chart.len() + 3));
    out.push_str("\n\n");

    out.push_str("1. Marks\n");
    out.push_str(&format!("Marks: {}\n", ctx.n_marks));
    out.push_str(&format!(
        "Unmatched: {} ({})\n",
        ctx.n_unmatched,
        format_f64_6(fraction(ctx.n_unmatched, ctx.n_marks))
    ));
    out.push_str(&format!("Duplicate keys: {}\n", ctx.duplicate_keys));
    out.push_str(&format!("Unclassified: {}\n\n", ctx.out_of_range));

    out.push_str("2. Values\n");
    match ctx.domain {
        Some((lo, hi)) => {
            out.push_str(&format!("Domain: [{}, {}]\n", format_f64_6(lo), format_f64_6(hi)));
        }
        None => out.push_str("Domain: n/a\n"),
    }
    if !ctx.values.is_empty() {
        out.push_str(&format!(
            "P10: {}\nMedian: {}\nP90: {}\n",
            format_f64_6(p10(&ctx.values)),
            format_f64_6(median(&ctx.values)),
            format_f64_6(p90(&ctx.values))
        ));
    }
    out.push('\n');

    out.push_str("3. Buckets\n");
    let total: usize = ctx.buckets.iter().map(|b| b.count).sum();
    for b in &ctx.buckets {
        out.push_str(&format!(
            "{:<24} {} {:>7} {}\n",
            b.label,
            b.color,
            b.count,
            format_f64_6(fraction(b.count, total))
        ));
    }

    if !ctx.notes.is_empty() {
        out.push_str("\n4. Notes\n");
        for note in &ctx.notes {
            out.push_str(&format!("- {note}\n"));
        }
    }

    out
}
