// ============================================================================
// RETAINED MODE ABSTRACTIONS
// ============================================================================

use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Attribute name to string value, e.g. `"stroke-dasharray" -> "12,600"`
pub type Attributes = BTreeMap<String, String>;

/// Builds an [`Attributes`] map from `name => value` pairs.
#[macro_export]
macro_rules! attrs {
    ($($name:expr => $value:expr),* $(,)?) => {{
        let mut map = $crate::scene::Attributes::new();
        $(map.insert($name.to_string(), $value.to_string());)*
        map
    }};
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Circle,
    Line,
    Polyline,
    Polygon,
    Path,
    Text,
    Group,
}

impl PrimitiveKind {
    pub fn tag(&self) -> &'static str {
        match self {
            PrimitiveKind::Circle => "circle",
            PrimitiveKind::Line => "line",
            PrimitiveKind::Polyline => "polyline",
            PrimitiveKind::Polygon => "polygon",
            PrimitiveKind::Path => "path",
            PrimitiveKind::Text => "text",
            PrimitiveKind::Group => "g",
        }
    }
}

/// Creates drawable primitives in whatever scene graph the host owns.
///
/// The gauge never holds on to a live scene; it describes primitives through
/// this trait and lets the host instantiate them.
pub trait PrimitiveFactory {
    type Handle;

    fn create(
        &mut self,
        kind: PrimitiveKind,
        attributes: Attributes,
        content: Option<String>,
    ) -> Self::Handle;

    fn append(&mut self, parent: &Self::Handle, child: Self::Handle);

    /// Removes everything created so far, before a redraw
    fn clear(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub kind: PrimitiveKind,
    pub attributes: Attributes,
    pub content: Option<String>,
    pub children: Vec<usize>,
    parent: Option<usize>,
}

impl Primitive {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimitiveId(usize);

/// In-memory scene: a flat arena of primitives with parent links
#[derive(Debug, Clone, Default)]
pub struct Scene {
    primitives: Vec<Primitive>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn get(&self, id: PrimitiveId) -> Option<&Primitive> {
        self.primitives.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives.iter()
    }

    /// Primitives without a parent, in creation order
    pub fn roots(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives.iter().filter(|p| p.parent.is_none())
    }

    pub fn with_class<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a Primitive> + 'a {
        self.primitives.iter().filter(move |p| p.has_class(class))
    }

    /// Serializes the scene as a standalone SVG document.
    ///
    /// `defs` is written verbatim inside a `<defs>` element when not empty.
    pub fn to_svg(&self, view_box: &str, defs: &str) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{}">"#,
            escape(view_box)
        );
        if !defs.is_empty() {
            let _ = write!(out, "<defs>{}</defs>", defs);
        }
        for (index, primitive) in self.primitives.iter().enumerate() {
            if primitive.parent.is_none() {
                self.write_node(&mut out, index);
            }
        }
        out.push_str("</svg>");
        out
    }

    fn write_node(&self, out: &mut String, index: usize) {
        let primitive = &self.primitives[index];
        let tag = primitive.kind.tag();
        let _ = write!(out, "<{}", tag);
        for (name, value) in &primitive.attributes {
            let _ = write!(out, r#" {}="{}""#, name, escape(value));
        }
        if primitive.children.is_empty() && primitive.content.is_none() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        if let Some(content) = &primitive.content {
            out.push_str(&escape(content));
        }
        for child in &primitive.children {
            self.write_node(out, *child);
        }
        let _ = write!(out, "</{}>", tag);
    }
}

impl PrimitiveFactory for Scene {
    type Handle = PrimitiveId;

    fn create(
        &mut self,
        kind: PrimitiveKind,
        attributes: Attributes,
        content: Option<String>,
    ) -> PrimitiveId {
        self.primitives.push(Primitive {
            kind,
            attributes,
            content,
            children: Vec::new(),
            parent: None,
        });
        PrimitiveId(self.primitives.len() - 1)
    }

    fn append(&mut self, parent: &PrimitiveId, child: PrimitiveId) {
        if parent.0 == child.0 || parent.0 >= self.primitives.len() {
            return;
        }
        if let Some(old_parent) = self.primitives[child.0].parent.take() {
            self.primitives[old_parent].children.retain(|c| *c != child.0);
        }
        self.primitives[child.0].parent = Some(parent.0);
        self.primitives[parent.0].children.push(child.0);
    }

    fn clear(&mut self) {
        self.primitives.clear();
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_builds_a_tree() {
        let mut scene = Scene::new();
        let group = scene.create(PrimitiveKind::Group, attrs! {"class" => "gauge"}, None);
        let circle = scene.create(PrimitiveKind::Circle, attrs! {"r" => 5}, None);
        scene.append(&group, circle);

        assert_eq!(scene.len(), 2);
        assert_eq!(scene.roots().count(), 1);
        assert_eq!(scene.get(group).unwrap().children, vec![1]);
    }

    #[test]
    fn svg_output_nests_and_escapes() {
        let mut scene = Scene::new();
        let group = scene.create(PrimitiveKind::Group, attrs! {"class" => "gauge"}, None);
        let text = scene.create(
            PrimitiveKind::Text,
            attrs! {"x" => 1, "y" => 2},
            Some("a < b".to_string()),
        );
        scene.append(&group, text);

        assert_eq!(
            scene.to_svg("0 0 10 10", ""),
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10"><g class="gauge"><text x="1" y="2">a &lt; b</text></g></svg>"#
        );
    }

    #[test]
    fn clear_empties_the_scene() {
        let mut scene = Scene::new();
        scene.create(PrimitiveKind::Line, Attributes::new(), None);
        scene.clear();
        assert!(scene.is_empty());
    }

    #[test]
    fn class_lookup() {
        let mut scene = Scene::new();
        scene.create(PrimitiveKind::Line, attrs! {"class" => "gauge marker large"}, None);
        scene.create(PrimitiveKind::Line, attrs! {"class" => "gauge marker small"}, None);
        assert_eq!(scene.with_class("marker").count(), 2);
        assert_eq!(scene.with_class("large").count(), 1);
    }
}
