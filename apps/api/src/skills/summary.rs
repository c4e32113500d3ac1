use crate::skills::engine::CategoryMap;

/// Human-readable rendering of the category map: a header per category with its skill
/// count, then one indented line per skill. Categories are separated by a blank line.
pub fn render_summary(categories: &CategoryMap) -> String {
    categories
        .iter()
        .map(|(category, skills)| {
            let noun = if skills.len() == 1 { "skill" } else { "skills" };
            let mut block = format!("{category} ({} {noun})\n", skills.len());
            for skill in skills {
                block.push_str("    ");
                block.push_str(skill);
                block.push('\n');
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n")
}
