/// Fallback series/slice colors, used when a spec carries no `colors` of its own.
pub const DEFAULT_PALETTE: [&str; 6] = [
    "#4f46e5", "#10b981", "#f59e0b", "#ef4444", "#0ea5e9", "#a855f7",
];

/// Picks the color for series (or slice) `index`.
///
/// Assignment is positional: `index` wraps modulo the palette length, so the same spec always
/// maps to the same colors no matter what the rows contain.
pub fn color_at(colors: &[String], index: usize) -> &str {
    if colors.is_empty() {
        DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()]
    } else {
        colors[index % colors.len()].as_str()
    }
}
