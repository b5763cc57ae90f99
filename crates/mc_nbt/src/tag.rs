//! In-memory representation of an NBT tree.

use std::ops::{Index, IndexMut};

use derive_more::Display;

use crate::error::{Error, Result};
use crate::path::PathSegment;

/// Discriminant of a tag as written on the wire
#[derive(Display, Debug, Copy, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TagType {
    #[default]
    End = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    ByteArray = 7,
    String = 8,
    List = 9,
    Compound = 10,
    IntArray = 11,
    LongArray = 12,
}

impl TagType {
    /// The byte used for this type on the wire
    pub const fn id(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for TagType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Ok(match value {
            0 => TagType::End,
            1 => TagType::Byte,
            2 => TagType::Short,
            3 => TagType::Int,
            4 => TagType::Long,
            5 => TagType::Float,
            6 => TagType::Double,
            7 => TagType::ByteArray,
            8 => TagType::String,
            9 => TagType::List,
            10 => TagType::Compound,
            11 => TagType::IntArray,
            12 => TagType::LongArray,
            _ => return Err(Error::UnknownTagType(value)),
        })
    }
}

/// A single NBT value.
///
/// Names are not part of the tag itself: a tag only has a name while it sits
/// inside a [`Compound`], which stores the name next to it.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    End,
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<i8>),
    String(String),
    List(List),
    Compound(Compound),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Tag {
    pub fn tag_type(&self) -> TagType {
        match self {
            Tag::End => TagType::End,
            Tag::Byte(_) => TagType::Byte,
            Tag::Short(_) => TagType::Short,
            Tag::Int(_) => TagType::Int,
            Tag::Long(_) => TagType::Long,
            Tag::Float(_) => TagType::Float,
            Tag::Double(_) => TagType::Double,
            Tag::ByteArray(_) => TagType::ByteArray,
            Tag::String(_) => TagType::String,
            Tag::List(_) => TagType::List,
            Tag::Compound(_) => TagType::Compound,
            Tag::IntArray(_) => TagType::IntArray,
            Tag::LongArray(_) => TagType::LongArray,
        }
    }

    pub fn as_i8(&self) -> Option<i8> {
        match self {
            Tag::Byte(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i16(&self) -> Option<i16> {
        match self {
            Tag::Short(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Tag::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Tag::Long(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Tag::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Tag::Double(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tag::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_byte_array(&self) -> Option<&[i8]> {
        match self {
            Tag::ByteArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_int_array(&self) -> Option<&[i32]> {
        match self {
            Tag::IntArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_long_array(&self) -> Option<&[i64]> {
        match self {
            Tag::LongArray(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Tag::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut List> {
        match self {
            Tag::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Tag::Compound(compound) => Some(compound),
            _ => None,
        }
    }

    pub fn as_compound_mut(&mut self) -> Option<&mut Compound> {
        match self {
            Tag::Compound(compound) => Some(compound),
            _ => None,
        }
    }

    /// Direct child tag addressed by a path segment.
    ///
    /// Array elements are plain numbers rather than tags, see [`Tag::array_element`].
    pub fn child(&self, segment: &PathSegment<'_>) -> Option<&Tag> {
        match (self, segment) {
            (Tag::Compound(compound), PathSegment::Key(key)) => compound.get(key),
            (Tag::List(list), PathSegment::Index(index)) => list.get(*index),
            _ => None,
        }
    }

    pub fn child_mut(&mut self, segment: &PathSegment<'_>) -> Option<&mut Tag> {
        match (self, segment) {
            (Tag::Compound(compound), PathSegment::Key(key)) => compound.get_mut(key),
            (Tag::List(list), PathSegment::Index(index)) => list.get_mut(*index),
            _ => None,
        }
    }

    /// Element of a byte, int or long array widened to `i64`
    pub fn array_element(&self, index: usize) -> Option<i64> {
        match self {
            Tag::ByteArray(v) => v.get(index).map(|&n| n as i64),
            Tag::IntArray(v) => v.get(index).map(|&n| n as i64),
            Tag::LongArray(v) => v.get(index).copied(),
            _ => None,
        }
    }
}

macro_rules! impl_from_for_tag {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Tag {
                fn from(value: $ty) -> Self {
                    Tag::$variant(value)
                }
            }
        )*
    };
}

impl_from_for_tag! {
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    Vec<i8> => ByteArray,
    String => String,
    List => List,
    Compound => Compound,
    Vec<i32> => IntArray,
    Vec<i64> => LongArray,
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        Tag::String(value.to_owned())
    }
}

/// A homogeneous, ordered sequence of unnamed tags
#[derive(Debug, Clone, Default, PartialEq)]
pub struct List {
    elements_type: TagType,
    elements: Vec<Tag>,
}

impl List {
    /// An empty list whose element type is [`TagType::End`]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty list that will only accept tags of `elements_type`
    pub fn with_type(elements_type: TagType) -> Self {
        Self {
            elements_type,
            elements: Vec::new(),
        }
    }

    /// Build a list from tags that must all share one type
    pub fn from_tags(tags: impl IntoIterator<Item = Tag>) -> Result<Self> {
        let mut list = Self::new();
        for tag in tags {
            list.push(tag)?;
        }
        Ok(list)
    }

    pub(crate) fn from_parts(elements_type: TagType, elements: Vec<Tag>) -> Self {
        Self {
            elements_type,
            elements,
        }
    }

    pub fn elements_type(&self) -> TagType {
        self.elements_type
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Tag> {
        self.elements.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Tag> {
        self.elements.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.elements.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Tag> {
        self.elements.iter_mut()
    }

    /// Append a tag.
    ///
    /// An empty list typed [`TagType::End`] takes on the type of its first element.
    pub fn push(&mut self, tag: impl Into<Tag>) -> Result<()> {
        let tag = tag.into();
        self.check_type(&tag)?;
        self.elements.push(tag);
        Ok(())
    }

    pub fn insert(&mut self, index: usize, tag: impl Into<Tag>) -> Result<()> {
        let tag = tag.into();
        self.check_type(&tag)?;
        self.elements.insert(index, tag);
        Ok(())
    }

    /// Replace the element at `index`, returning the old one
    pub fn replace(&mut self, index: usize, tag: impl Into<Tag>) -> Result<Option<Tag>> {
        let tag = tag.into();
        if index >= self.elements.len() {
            return Ok(None);
        }
        self.check_type(&tag)?;
        Ok(Some(std::mem::replace(&mut self.elements[index], tag)))
    }

    /// Remove the element at `index`; the element type is kept when the list empties
    pub fn remove(&mut self, index: usize) -> Option<Tag> {
        (index < self.elements.len()).then(|| self.elements.remove(index))
    }

    fn check_type(&mut self, tag: &Tag) -> Result<()> {
        let found = tag.tag_type();
        if self.elements.is_empty() && self.elements_type == TagType::End {
            self.elements_type = found;
        }
        if found != self.elements_type {
            return Err(Error::ListTypeMismatch {
                expected: self.elements_type,
                found,
            });
        }
        Ok(())
    }
}

impl From<Vec<Compound>> for List {
    fn from(value: Vec<Compound>) -> Self {
        Self::from_parts(
            TagType::Compound,
            value.into_iter().map(Tag::Compound).collect(),
        )
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl IntoIterator for List {
    type Item = Tag;
    type IntoIter = std::vec::IntoIter<Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

/// An ordered sequence of named tags.
///
/// Entry order is significant and survives a decode/encode cycle. Names are not
/// required to be unique; lookups return the first match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compound {
    entries: Vec<(String, Tag)>,
}

impl Compound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, tag)| tag)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Tag> {
        self.entries
            .iter_mut()
            .find(|(key, _)| key == name)
            .map(|(_, tag)| tag)
    }

    /// Entry at a position, with its name
    pub fn get_index(&self, index: usize) -> Option<(&str, &Tag)> {
        self.entries
            .get(index)
            .map(|(name, tag)| (name.as_str(), tag))
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(key, _)| key == name)
    }

    /// Append an entry without looking for an existing one of the same name
    pub fn push(&mut self, name: impl Into<String>, tag: impl Into<Tag>) {
        self.entries.push((name.into(), tag.into()));
    }

    /// Replace the first entry called `name` in place, or append a new one
    pub fn insert(&mut self, name: impl Into<String>, tag: impl Into<Tag>) -> Option<Tag> {
        let name = name.into();
        let tag = tag.into();
        match self.get_mut(&name) {
            Some(existing) => Some(std::mem::replace(existing, tag)),
            None => {
                self.entries.push((name, tag));
                None
            }
        }
    }

    pub fn insert_at(&mut self, index: usize, name: impl Into<String>, tag: impl Into<Tag>) {
        self.entries.insert(index, (name.into(), tag.into()));
    }

    /// Remove the first entry called `name`, keeping the order of the others
    pub fn remove(&mut self, name: &str) -> Option<Tag> {
        let index = self.position(name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tag)> {
        self.entries.iter().map(|(name, tag)| (name.as_str(), tag))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut Tag)> {
        self.entries
            .iter_mut()
            .map(|(name, tag)| (name.as_str(), tag))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn get_i8(&self, name: &str) -> Option<i8> {
        self.get(name).and_then(Tag::as_i8)
    }

    pub fn get_i32(&self, name: &str) -> Option<i32> {
        self.get(name).and_then(Tag::as_i32)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Tag::as_i64)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Tag::as_str)
    }

    pub fn get_list(&self, name: &str) -> Option<&List> {
        self.get(name).and_then(Tag::as_list)
    }

    pub fn get_compound(&self, name: &str) -> Option<&Compound> {
        self.get(name).and_then(Tag::as_compound)
    }

    pub fn get_long_array(&self, name: &str) -> Option<&[i64]> {
        self.get(name).and_then(Tag::as_long_array)
    }
}

impl Index<&str> for Compound {
    type Output = Tag;

    fn index(&self, name: &str) -> &Tag {
        self.get(name)
            .unwrap_or_else(|| panic!("no entry named {name:?} in compound"))
    }
}

impl IndexMut<&str> for Compound {
    fn index_mut(&mut self, name: &str) -> &mut Tag {
        self.get_mut(name)
            .unwrap_or_else(|| panic!("no entry named {name:?} in compound"))
    }
}

impl<K: Into<String>, V: Into<Tag>> FromIterator<(K, V)> for Compound {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, tag)| (name.into(), tag.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Compound {
    type Item = (String, Tag);
    type IntoIter = std::vec::IntoIter<(String, Tag)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// A borrowed position inside a tag tree.
///
/// The cursor knows how it was reached: it holds a non-owning link to its
/// parent cursor and the segment that leads from the parent to it. This is
/// what lets a node report its name and its full path without the tree
/// itself storing back-references.
#[derive(Debug, Clone, Copy)]
pub struct TagRef<'a> {
    tag: &'a Tag,
    parent: Option<&'a TagRef<'a>>,
    segment: Option<PathSegment<'a>>,
}

impl<'a> TagRef<'a> {
    pub fn root(tag: &'a Tag) -> Self {
        Self {
            tag,
            parent: None,
            segment: None,
        }
    }

    pub fn tag(&self) -> &'a Tag {
        self.tag
    }

    pub fn parent(&self) -> Option<&'a TagRef<'a>> {
        self.parent
    }

    pub fn segment(&self) -> Option<PathSegment<'a>> {
        self.segment
    }

    /// Name of this tag, present only for direct children of a compound
    pub fn name(&self) -> Option<&'a str> {
        match self.segment {
            Some(PathSegment::Key(name)) => Some(name),
            _ => None,
        }
    }

    /// Number of ancestors between this tag and the root
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent;
        while let Some(parent) = current {
            depth += 1;
            current = parent.parent;
        }
        depth
    }

    /// Cursors for every child tag, in order
    pub fn children(&'a self) -> Vec<TagRef<'a>> {
        match self.tag {
            Tag::Compound(compound) => compound
                .iter()
                .map(|(name, tag)| self.with_child(tag, PathSegment::Key(name)))
                .collect(),
            Tag::List(list) => list
                .iter()
                .enumerate()
                .map(|(index, tag)| self.with_child(tag, PathSegment::Index(index)))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn child(&'a self, segment: PathSegment<'a>) -> Option<TagRef<'a>> {
        self.tag
            .child(&segment)
            .map(|tag| self.with_child(tag, segment))
    }

    /// Dotted/bracketed path from the root, e.g. `Level.sections[3].Y`
    pub fn path(&self) -> String {
        let mut segments = Vec::with_capacity(self.depth());
        let mut current = Some(self);
        while let Some(node) = current {
            if let Some(segment) = node.segment {
                segments.push(segment);
            }
            current = node.parent;
        }
        segments.reverse();
        crate::path::format_path(&segments)
    }

    fn with_child(&'a self, tag: &'a Tag, segment: PathSegment<'a>) -> TagRef<'a> {
        TagRef {
            tag,
            parent: Some(self),
            segment: Some(segment),
        }
    }
}

/// Visit every tag depth-first, parents before children
pub fn walk<'a>(node: &TagRef<'a>, visit: &mut impl FnMut(&TagRef<'_>)) {
    visit(node);
    for child in node.children() {
        walk(&child, visit);
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::error::{Error, Result};
    use crate::path::PathSegment;
    use crate::tag::{walk, Compound, List, Tag, TagRef, TagType};

    #[test]
    fn tag_type_ids() -> Result<()> {
        for id in 0..=12u8 {
            assert_eq!(TagType::try_from(id)?.id(), id);
        }
        assert!(matches!(
            TagType::try_from(13),
            Err(Error::UnknownTagType(13))
        ));

        assert_eq!(Tag::Compound(Compound::new()).tag_type(), TagType::Compound);
        assert_eq!(Tag::LongArray(vec![]).tag_type(), TagType::LongArray);

        Ok(())
    }

    #[test]
    fn list_adopts_first_type() -> Result<()> {
        let mut list = List::new();
        assert_eq!(list.elements_type(), TagType::End);

        list.push(1i32)?;
        list.push(2i32)?;
        assert_eq!(list.elements_type(), TagType::Int);

        let err = list.push("three").unwrap_err();
        assert!(matches!(
            err,
            Error::ListTypeMismatch {
                expected: TagType::Int,
                found: TagType::String
            }
        ));
        assert_eq!(list.len(), 2);

        Ok(())
    }

    #[test]
    fn typed_empty_list_keeps_type() -> Result<()> {
        let mut list = List::with_type(TagType::Compound);
        assert!(list.push(1i8).is_err());

        list.push(Compound::new())?;
        list.remove(0);
        assert_eq!(list.elements_type(), TagType::Compound);

        Ok(())
    }

    #[test]
    fn compound_keeps_order_and_duplicates() {
        let mut compound = Compound::new();
        compound.push("b", 1i32);
        compound.push("a", 2i32);
        compound.push("b", 3i32);

        assert_eq!(compound.keys().collect::<Vec<_>>(), vec!["b", "a", "b"]);
        assert_eq!(compound.get_i32("b"), Some(1));

        assert_eq!(compound.insert("b", 4i32), Some(Tag::Int(1)));
        assert_eq!(compound.keys().collect::<Vec<_>>(), vec!["b", "a", "b"]);
        assert_eq!(compound["b"], Tag::Int(4));

        assert_eq!(compound.remove("b"), Some(Tag::Int(4)));
        assert_eq!(compound.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(compound.get_i32("b"), Some(3));
    }

    #[test]
    fn cursor_reports_names_and_paths() -> Result<()> {
        let mut section = Compound::new();
        section.push("Y", -4i8);
        let mut sections = List::new();
        sections.push(Compound::new())?;
        sections.push(section)?;
        let mut level = Compound::new();
        level.push("sections", sections);
        let mut root = Compound::new();
        root.push("Level", level);
        let root = Tag::Compound(root);

        let root_ref = TagRef::root(&root);
        assert_eq!(root_ref.path(), "");
        assert_eq!(root_ref.name(), None);

        let level_ref = root_ref.child(PathSegment::Key("Level")).unwrap();
        let sections_ref = level_ref.child(PathSegment::Key("sections")).unwrap();
        let section_ref = sections_ref.child(PathSegment::Index(1)).unwrap();
        let y_ref = section_ref.child(PathSegment::Key("Y")).unwrap();

        assert_eq!(section_ref.name(), None);
        assert_eq!(y_ref.name(), Some("Y"));
        assert_eq!(y_ref.depth(), 4);
        assert_eq!(y_ref.path(), "Level.sections[1].Y");
        assert_eq!(y_ref.parent().map(|p| p.path()), Some("Level.sections[1]".into()));

        let mut paths = Vec::new();
        walk(&root_ref, &mut |node| paths.push(node.path()));
        assert_eq!(
            paths,
            vec![
                "",
                "Level",
                "Level.sections",
                "Level.sections[0]",
                "Level.sections[1]",
                "Level.sections[1].Y",
            ]
        );

        Ok(())
    }

    #[test]
    fn array_elements_are_values() {
        let tag = Tag::IntArray(vec![5, -6]);
        assert_eq!(tag.array_element(1), Some(-6));
        assert_eq!(tag.array_element(2), None);
        assert!(TagRef::root(&tag).children().is_empty());
    }
}
