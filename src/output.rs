/// Leading whitespace for progress lines at nesting `depth`.
pub fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}
