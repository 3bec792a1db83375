//! Depth-first traversal of a tag tree without recursion.
//!
//! Anything that has to visit a whole tree (encoding, cloning, formatting)
//! goes through [`Walk`], so its stack use is the same at any depth.

use crate::{Compound, List, Tag, TagType};

/// One step of a walk.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Step<'a> {
    /// A tag that is not a container, with its key if it is in a compound.
    Leaf(Option<&'a String>, &'a Tag),
    /// A list or compound, with its key. Its contents follow, then a `Close`.
    Open(Option<&'a String>, &'a Tag),
    /// The most recently opened container has no more contents.
    Close(TagType),
}

enum Frame<'a> {
    Compound(indexmap::map::Iter<'a, String, Tag>),
    List(std::slice::Iter<'a, Tag>),
}

pub(crate) struct Walk<'a> {
    first: Option<&'a Tag>,
    frames: Vec<Frame<'a>>,
    // Walks over the contents of a container stop when it runs out, without a
    // `Close` for the container itself.
    inside: bool,
}

impl<'a> Walk<'a> {
    /// Walk a tag, including itself.
    pub fn new(tag: &'a Tag) -> Self {
        Self {
            first: Some(tag),
            frames: Vec::new(),
            inside: false,
        }
    }

    /// Walk the entries of a compound.
    pub fn compound(compound: &'a Compound) -> Self {
        Self {
            first: None,
            frames: vec![Frame::Compound(compound.iter())],
            inside: true,
        }
    }

    /// Walk the items of a list.
    pub fn list(list: &'a List) -> Self {
        Self {
            first: None,
            frames: vec![Frame::List(list.iter())],
            inside: true,
        }
    }

    fn visit(&mut self, key: Option<&'a String>, tag: &'a Tag) -> Step<'a> {
        match tag {
            Tag::Compound(c) => {
                self.frames.push(Frame::Compound(c.iter()));
                Step::Open(key, tag)
            }
            Tag::List(l) => {
                self.frames.push(Frame::List(l.iter()));
                Step::Open(key, tag)
            }
            _ => Step::Leaf(key, tag),
        }
    }

    fn close(&mut self, kind: TagType) -> Option<Step<'a>> {
        self.frames.pop();
        if self.inside && self.frames.is_empty() {
            None
        } else {
            Some(Step::Close(kind))
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = Step<'a>;

    fn next(&mut self) -> Option<Step<'a>> {
        if let Some(tag) = self.first.take() {
            return Some(self.visit(None, tag));
        }

        let (key, tag) = match self.frames.last_mut()? {
            Frame::Compound(entries) => match entries.next() {
                Some((key, tag)) => (Some(key), tag),
                None => return self.close(TagType::Compound),
            },
            Frame::List(items) => match items.next() {
                Some(tag) => (None, tag),
                None => return self.close(TagType::List),
            },
        };

        Some(self.visit(key, tag))
    }
}
