pub const EDUCATION_BLUES: &[&str] = &[
    "#CEE8F0", "#A9D6E5", "#7DC1D8", "#51ADCB", "#3490AF", "#276C83", "#1A4858",
];

// Cold to hot.
pub const TEMPERATURE_DIVERGING: &[&str] = &[
    "#313695", "#4575b4", "#74add1", "#abd9e9", "#e0f3f8", "#ffffbf", "#fee090", "#fdae61",
    "#f46d43", "#d73027", "#a50026",
];

pub const CATEGORY_20: &[&str] = &[
    "#1f77b4", "#aec7e8", "#ff7f0e", "#ffbb78", "#2ca02c", "#98df8a", "#d62728", "#ff9896",
    "#9467bd", "#c5b0d5", "#8c564b", "#c49c94", "#e377c2", "#f7b6d2", "#7f7f7f", "#c7c7c7",
    "#bcbd22", "#dbdb8d", "#17becf", "#9edae5",
];

pub fn ordinal_color(range: &[&'static str], index: usize) -> &'static str {
    if range.is_empty() {
        return "#000000";
    }
    range[index % range.len()]
}
