use crate::models::{ApiCategory, Category};

/// Restructure the flat API category list into a two-level tree.
///
/// The API encodes hierarchy in the name: "Entertainment: Books" is the
/// "Books" child of an "Entertainment" parent. Parents that only exist
/// through their children get the synthetic id `-1`; a quiz can only be
/// created from a real (leaf or plain) category id.
pub fn structurize(categories: Vec<ApiCategory>) -> Vec<Category> {
    let mut structured: Vec<Category> = Vec::new();

    for category in categories {
        match category.name.split_once(": ") {
            None => structured.push(Category::leaf(category.id, category.name)),
            Some((parent_name, child_name)) => {
                let child = Category::leaf(category.id, child_name);
                match structured.iter_mut().find(|c| c.name == parent_name) {
                    Some(parent) => parent.children.push(child),
                    None => structured.push(Category {
                        id: -1,
                        name: parent_name.to_string(),
                        children: vec![child],
                    }),
                }
            }
        }
    }

    structured
}
