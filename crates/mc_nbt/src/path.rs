//! Dotted/bracketed tag paths such as `Level.sections[3].palette[0].Name`.

use std::fmt::Write;

use winnow::ascii::dec_uint;
use winnow::combinator::{alt, delimited, preceded, repeat};
use winnow::prelude::*;
use winnow::token::take_while;
use winnow::PResult;

use crate::error::{Error, Result};
use crate::tag::Tag;

/// One step from a tag to one of its children
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment<'a> {
    /// a named entry of a compound
    Key(&'a str),
    /// a list element, or an element of an array tag
    Index(usize),
}

fn key<'s>(input: &mut &'s str) -> PResult<&'s str> {
    take_while(1.., |c: char| c != '.' && c != '[' && c != ']').parse_next(input)
}

fn index(input: &mut &str) -> PResult<usize> {
    delimited('[', dec_uint::<_, u32, _>, ']')
        .map(|n| n as usize)
        .parse_next(input)
}

fn first_segment<'s>(input: &mut &'s str) -> PResult<PathSegment<'s>> {
    alt((index.map(PathSegment::Index), key.map(PathSegment::Key))).parse_next(input)
}

fn next_segment<'s>(input: &mut &'s str) -> PResult<PathSegment<'s>> {
    alt((
        index.map(PathSegment::Index),
        preceded('.', key).map(PathSegment::Key),
    ))
    .parse_next(input)
}

fn segments<'s>(input: &mut &'s str) -> PResult<Vec<PathSegment<'s>>> {
    let first = first_segment(input)?;
    let rest: Vec<PathSegment<'s>> = repeat(0.., next_segment).parse_next(input)?;

    let mut all = Vec::with_capacity(rest.len() + 1);
    all.push(first);
    all.extend(rest);
    Ok(all)
}

/// Split a path into its segments; the empty path addresses the root
pub fn parse_path(path: &str) -> Result<Vec<PathSegment<'_>>> {
    if path.is_empty() {
        return Ok(Vec::new());
    }
    segments
        .parse(path)
        .map_err(|_| Error::InvalidPath(path.to_owned()))
}

/// Render segments back into the dotted/bracketed form
pub fn format_path(segments: &[PathSegment<'_>]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            PathSegment::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
            PathSegment::Index(index) => {
                let _ = write!(out, "[{index}]");
            }
        }
    }
    out
}

impl Tag {
    /// Follow a path from this tag.
    ///
    /// ```
    /// use mc_nbt::tag::{Compound, Tag};
    ///
    /// let mut inner = Compound::new();
    /// inner.push("Name", "minecraft:stone");
    /// let mut root = Compound::new();
    /// root.push("block", inner);
    ///
    /// let root = Tag::Compound(root);
    /// let name = root.lookup("block.Name").unwrap();
    /// assert_eq!(name.and_then(Tag::as_str), Some("minecraft:stone"));
    /// ```
    pub fn lookup(&self, path: &str) -> Result<Option<&Tag>> {
        let mut current = self;
        for segment in parse_path(path)? {
            match current.child(&segment) {
                Some(child) => current = child,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    pub fn lookup_mut(&mut self, path: &str) -> Result<Option<&mut Tag>> {
        let mut current = self;
        for segment in parse_path(path)? {
            match current.child_mut(&segment) {
                Some(child) => current = child,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }
}
