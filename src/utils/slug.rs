/// Derive a URL slug from a title.
///
/// Lowercases the input, replaces every character outside `[0-9a-z_]` with
/// `-`, collapses runs of `-` into one and trims leading/trailing `-`.
/// Collision suffixing (`-1`, `-2`, ...) is the post admin service's job,
/// since it needs storage access.
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());

    for c in input.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
            slug.push(c);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }

    slug.trim_matches('-').to_string()
}
