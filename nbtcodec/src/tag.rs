use std::fmt::{self, Write as _};
use std::ops::{Deref, DerefMut};

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::walk::{Step, Walk};
use crate::TagType;

/// A complete NBT value. It owns its data, and lists and compounds own their
/// children outright. There is no sharing between trees.
///
/// ```
/// # use nbtcodec::{compound, Tag};
/// let player = Tag::Compound(compound! {
///     "Health" => 20.0_f32,
///     "Name" => "Steve",
/// });
/// assert_eq!(player.as_compound().unwrap()["Name"].as_str(), Some("Steve"));
/// ```
///
/// `Clone`, `PartialEq` and `Debug` work iteratively, so trees of any depth
/// the decoder accepts can be copied, compared and printed.
pub enum Tag {
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
    pub fn is_container(&self) -> bool {
        matches!(self, Tag::List(_) | Tag::Compound(_))
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Tag::Byte(v) => Some(v as i64),
            Tag::Short(v) => Some(v as i64),
            Tag::Int(v) => Some(v as i64),
            Tag::Long(v) => Some(v),
            Tag::Float(v) => Some(v as i64),
            Tag::Double(v) => Some(v as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Tag::Byte(v) => Some(v as f64),
            Tag::Short(v) => Some(v as f64),
            Tag::Int(v) => Some(v as f64),
            Tag::Long(v) => Some(v as f64),
            Tag::Float(v) => Some(v as f64),
            Tag::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tag::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Tag::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Tag::Compound(v) => Some(v),
            _ => None,
        }
    }
}

/// A homogeneous NBT list. Every item has the type given by
/// [`element_type`][`List::element_type`], which is checked on construction,
/// so a `List` that exists is always writable.
///
/// An empty list conventionally has the element type [`TagType::End`].
pub struct List {
    element: TagType,
    items: Vec<Tag>,
}

impl List {
    /// Create a list, failing if any item is not of type `element`.
    pub fn new(element: TagType, items: Vec<Tag>) -> Result<Self> {
        if element == TagType::End && !items.is_empty() {
            return Err(Error::malformed("list of end tags must be empty"));
        }

        if let Some(bad) = items.iter().find(|t| t.tag_type() != element) {
            return Err(Error::malformed(format!(
                "heterogeneous list: expected {:?}, found {:?}",
                element,
                bad.tag_type()
            )));
        }

        Ok(Self { element, items })
    }

    /// An empty list of the given element type.
    pub fn empty(element: TagType) -> Self {
        Self {
            element,
            items: Vec::new(),
        }
    }

    /// Only for callers that already guarantee homogeneity, ie the decoder.
    pub(crate) fn from_parts(element: TagType, items: Vec<Tag>) -> Self {
        Self { element, items }
    }

    pub fn element_type(&self) -> TagType {
        self.element
    }

    pub fn push(&mut self, tag: Tag) -> Result<()> {
        if self.items.is_empty() && self.element == TagType::End {
            self.element = tag.tag_type();
        } else if tag.tag_type() != self.element {
            return Err(Error::malformed(format!(
                "heterogeneous list: expected {:?}, found {:?}",
                self.element,
                tag.tag_type()
            )));
        }
        self.items.push(tag);
        Ok(())
    }

    pub fn into_items(mut self) -> Vec<Tag> {
        std::mem::take(&mut self.items)
    }
}

impl Deref for List {
    type Target = [Tag];

    fn deref(&self) -> &Self::Target {
        &self.items
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Named children of a compound, kept in the order they were inserted (or
/// read). Inserting an existing key replaces the value in place.
///
/// Two compounds are equal when they hold the same keys with equal values,
/// whatever the order.
#[derive(Default)]
pub struct Compound(IndexMap<String, Tag>);

impl Compound {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn into_inner(mut self) -> IndexMap<String, Tag> {
        std::mem::take(&mut self.0)
    }
}

impl Deref for Compound {
    type Target = IndexMap<String, Tag>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Compound {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<K: Into<String>> FromIterator<(K, Tag)> for Compound {
    fn from_iter<I: IntoIterator<Item = (K, Tag)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<'a> IntoIterator for &'a Compound {
    type Item = (&'a String, &'a Tag);
    type IntoIter = indexmap::map::Iter<'a, String, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// The derived drop glue recurses once per level of nesting, which a hostile
// document can make arbitrarily deep. Containers hand their nested children to
// a work list instead, so dropping never goes more than one level down.
fn drop_flat(mut pending: Vec<Tag>) {
    while let Some(tag) = pending.pop() {
        match tag {
            Tag::Compound(mut c) => {
                pending.extend(c.0.drain(..).map(|(_, v)| v).filter(Tag::is_container))
            }
            Tag::List(mut l) => {
                pending.extend(l.items.drain(..).filter(Tag::is_container))
            }
            _ => {}
        }
    }
}

impl Drop for Compound {
    fn drop(&mut self) {
        let nested: Vec<Tag> = self
            .0
            .drain(..)
            .map(|(_, v)| v)
            .filter(Tag::is_container)
            .collect();
        drop_flat(nested);
    }
}

impl Drop for List {
    fn drop(&mut self) {
        if self.element == TagType::List || self.element == TagType::Compound {
            drop_flat(std::mem::take(&mut self.items));
        }
    }
}

/// The compound at the top of every document, along with the document's
/// name (usually empty).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "arbitrary1", derive(arbitrary::Arbitrary))]
pub struct RootCompound {
    pub name: String,
    pub body: Compound,
}

impl RootCompound {
    pub fn new(name: impl Into<String>, body: Compound) -> Self {
        Self {
            name: name.into(),
            body,
        }
    }
}

#[cfg(feature = "arbitrary1")]
fn arb_of_type(u: &mut arbitrary::Unstructured, tag_type: TagType) -> arbitrary::Result<Tag> {
    Ok(match tag_type {
        TagType::End => return Err(arbitrary::Error::IncorrectFormat),
        TagType::Byte => Tag::Byte(u.arbitrary()?),
        TagType::Short => Tag::Short(u.arbitrary()?),
        TagType::Int => Tag::Int(u.arbitrary()?),
        TagType::Long => Tag::Long(u.arbitrary()?),
        TagType::Float => Tag::Float(u.arbitrary()?),
        TagType::Double => Tag::Double(u.arbitrary()?),
        TagType::ByteArray => Tag::ByteArray(u.arbitrary()?),
        TagType::String => Tag::String(u.arbitrary()?),
        TagType::IntArray => Tag::IntArray(u.arbitrary()?),
        TagType::LongArray => Tag::LongArray(u.arbitrary()?),
        TagType::Compound => Tag::Compound(u.arbitrary()?),

        // Lists need to all be the same type.
        TagType::List => {
            let element: TagType = u.arbitrary()?;
            if element == TagType::End {
                return Ok(Tag::List(List::empty(TagType::End)));
            }

            let len = u.arbitrary_len::<u64>()?;
            let mut items = Vec::with_capacity(len);
            for _ in 0..len {
                items.push(arb_of_type(u, element)?);
            }
            Tag::List(List::from_parts(element, items))
        }
    })
}

#[cfg(feature = "arbitrary1")]
impl<'a> arbitrary::Arbitrary<'a> for Tag {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        let tag_type: TagType = u.arbitrary()?;
        arb_of_type(u, tag_type)
    }
}

#[cfg(feature = "arbitrary1")]
impl<'a> arbitrary::Arbitrary<'a> for Compound {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        u.arbitrary_iter::<(String, Tag)>()?.collect()
    }
}

// ------------- Clone, PartialEq and Debug -------------
//
// Derived impls recurse once per level of nesting, just like drop glue. These
// go through `Walk` or an explicit work list instead.

impl Tag {
    /// A copy of a leaf, or an empty container of the same kind with room for
    /// the original's contents.
    fn shallow_clone(&self) -> Tag {
        match self {
            Tag::Byte(v) => Tag::Byte(*v),
            Tag::Short(v) => Tag::Short(*v),
            Tag::Int(v) => Tag::Int(*v),
            Tag::Long(v) => Tag::Long(*v),
            Tag::Float(v) => Tag::Float(*v),
            Tag::Double(v) => Tag::Double(*v),
            Tag::ByteArray(v) => Tag::ByteArray(v.clone()),
            Tag::String(v) => Tag::String(v.clone()),
            Tag::IntArray(v) => Tag::IntArray(v.clone()),
            Tag::LongArray(v) => Tag::LongArray(v.clone()),
            Tag::List(l) => Tag::List(List::from_parts(l.element, Vec::with_capacity(l.len()))),
            Tag::Compound(c) => Tag::Compound(Compound(IndexMap::with_capacity(c.len()))),
        }
    }
}

/// Somewhere finished children end up while a tree is rebuilt.
trait Parent {
    fn adopt(&mut self, key: Option<String>, child: Tag);
}

impl Parent for List {
    fn adopt(&mut self, _key: Option<String>, child: Tag) {
        self.items.push(child);
    }
}

impl Parent for Compound {
    fn adopt(&mut self, key: Option<String>, child: Tag) {
        if let Some(key) = key {
            self.0.insert(key, child);
        }
    }
}

impl Parent for Tag {
    fn adopt(&mut self, key: Option<String>, child: Tag) {
        match self {
            Tag::List(l) => l.adopt(key, child),
            Tag::Compound(c) => c.adopt(key, child),
            _ => {}
        }
    }
}

/// Fill `top` with copies of everything `walk` visits.
fn rebuild<P: Parent>(mut top: P, walk: Walk<'_>) -> P {
    let mut open: Vec<(Option<String>, Tag)> = Vec::new();

    for step in walk {
        let (key, done) = match step {
            Step::Open(key, tag) => {
                open.push((key.cloned(), tag.shallow_clone()));
                continue;
            }
            Step::Leaf(key, tag) => (key.cloned(), tag.shallow_clone()),
            Step::Close(_) => match open.pop() {
                Some(done) => done,
                None => continue,
            },
        };

        match open.last_mut() {
            Some((_, parent)) => parent.adopt(key, done),
            None => top.adopt(key, done),
        }
    }

    top
}

impl Clone for Tag {
    fn clone(&self) -> Self {
        match self {
            Tag::List(l) => Tag::List(l.clone()),
            Tag::Compound(c) => Tag::Compound(c.clone()),
            leaf => leaf.shallow_clone(),
        }
    }
}

impl Clone for List {
    fn clone(&self) -> Self {
        let top = List::from_parts(self.element, Vec::with_capacity(self.len()));
        rebuild(top, Walk::list(self))
    }
}

impl Clone for Compound {
    fn clone(&self) -> Self {
        let top = Compound(IndexMap::with_capacity(self.len()));
        rebuild(top, Walk::compound(self))
    }
}

type Pairs<'a> = Vec<(&'a Tag, &'a Tag)>;

/// Queue the items of two lists for comparison. False if the lists already
/// differ in type or length.
fn pair_lists<'a>(a: &'a List, b: &'a List, pending: &mut Pairs<'a>) -> bool {
    if a.element != b.element || a.items.len() != b.items.len() {
        return false;
    }
    pending.extend(a.items.iter().zip(&b.items));
    true
}

/// Queue the values of two compounds by key. False if the key sets differ.
fn pair_compounds<'a>(a: &'a Compound, b: &'a Compound, pending: &mut Pairs<'a>) -> bool {
    if a.len() != b.len() {
        return false;
    }
    for (key, value) in &a.0 {
        match b.get(key) {
            Some(other) => pending.push((value, other)),
            None => return false,
        }
    }
    true
}

fn all_equal(mut pending: Pairs<'_>) -> bool {
    while let Some(pair) = pending.pop() {
        let same = match pair {
            (Tag::Byte(a), Tag::Byte(b)) => a == b,
            (Tag::Short(a), Tag::Short(b)) => a == b,
            (Tag::Int(a), Tag::Int(b)) => a == b,
            (Tag::Long(a), Tag::Long(b)) => a == b,
            (Tag::Float(a), Tag::Float(b)) => a == b,
            (Tag::Double(a), Tag::Double(b)) => a == b,
            (Tag::ByteArray(a), Tag::ByteArray(b)) => a == b,
            (Tag::String(a), Tag::String(b)) => a == b,
            (Tag::IntArray(a), Tag::IntArray(b)) => a == b,
            (Tag::LongArray(a), Tag::LongArray(b)) => a == b,
            (Tag::List(a), Tag::List(b)) => pair_lists(a, b, &mut pending),
            (Tag::Compound(a), Tag::Compound(b)) => pair_compounds(a, b, &mut pending),
            _ => false,
        };
        if !same {
            return false;
        }
    }
    true
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        all_equal(vec![(self, other)])
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = Vec::new();
        pair_lists(self, other, &mut pending) && all_equal(pending)
    }
}

impl PartialEq for Compound {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = Vec::new();
        pair_compounds(self, other, &mut pending) && all_equal(pending)
    }
}

/// Prints a walk in the shape `derive(Debug)` would, indented for `{:#?}`.
struct DebugWriter<'a, 'b> {
    f: &'a mut fmt::Formatter<'b>,
    // One entry per open container: whether it has printed anything yet.
    seen: Vec<bool>,
}

impl DebugWriter<'_, '_> {
    fn newline(&mut self) -> fmt::Result {
        self.f.write_char('\n')?;
        for _ in 0..self.seen.len() {
            self.f.write_str("    ")?;
        }
        Ok(())
    }

    /// Separator and key ahead of the next item in the innermost container.
    fn item(&mut self, key: Option<&String>) -> fmt::Result {
        let first = match self.seen.last_mut() {
            Some(seen) => !std::mem::replace(seen, true),
            None => return self.key(key),
        };
        if self.f.alternate() {
            if !first {
                self.f.write_char(',')?;
            }
            self.newline()?;
        } else if !first {
            self.f.write_str(", ")?;
        }
        self.key(key)
    }

    fn key(&mut self, key: Option<&String>) -> fmt::Result {
        if let Some(key) = key {
            write!(self.f, "{:?}: ", key)?;
        }
        Ok(())
    }

    fn open(&mut self, opener: &str) -> fmt::Result {
        self.f.write_str(opener)?;
        self.seen.push(false);
        Ok(())
    }

    fn close(&mut self, closer: &str) -> fmt::Result {
        let had_items = self.seen.pop().unwrap_or(false);
        if had_items && self.f.alternate() {
            self.f.write_char(',')?;
            self.newline()?;
        }
        self.f.write_str(closer)
    }

    fn step(&mut self, step: Step<'_>) -> fmt::Result {
        match step {
            Step::Open(key, Tag::List(l)) => {
                self.item(key)?;
                write!(self.f, "List({:?}, ", l.element)?;
                self.open("[")
            }
            Step::Open(key, _) => {
                self.item(key)?;
                self.open("Compound({")
            }
            Step::Leaf(key, tag) => {
                self.item(key)?;
                self.leaf(tag)
            }
            Step::Close(TagType::List) => self.close("])"),
            Step::Close(_) => self.close("})"),
        }
    }

    fn leaf(&mut self, tag: &Tag) -> fmt::Result {
        match tag {
            Tag::Byte(v) => write!(self.f, "Byte({:?})", v),
            Tag::Short(v) => write!(self.f, "Short({:?})", v),
            Tag::Int(v) => write!(self.f, "Int({:?})", v),
            Tag::Long(v) => write!(self.f, "Long({:?})", v),
            Tag::Float(v) => write!(self.f, "Float({:?})", v),
            Tag::Double(v) => write!(self.f, "Double({:?})", v),
            Tag::ByteArray(v) => write!(self.f, "ByteArray({:?})", v),
            Tag::String(v) => write!(self.f, "String({:?})", v),
            Tag::IntArray(v) => write!(self.f, "IntArray({:?})", v),
            Tag::LongArray(v) => write!(self.f, "LongArray({:?})", v),
            // Walks report containers as Open, never as leaves.
            Tag::List(_) | Tag::Compound(_) => Ok(()),
        }
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut w = DebugWriter { f, seen: Vec::new() };
        Walk::new(self).try_for_each(|step| w.step(step))
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut w = DebugWriter { f, seen: Vec::new() };
        write!(w.f, "List({:?}, ", self.element)?;
        w.open("[")?;
        Walk::list(self).try_for_each(|step| w.step(step))?;
        w.close("])")
    }
}

impl fmt::Debug for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut w = DebugWriter { f, seen: Vec::new() };
        w.open("{")?;
        Walk::compound(self).try_for_each(|step| w.step(step))?;
        w.close("}")
    }
}

// ------------- Serialize impls -------------
//
// Lets a tree be dumped to any serde format, mostly for inspection tools. The
// array types are serialized as plain sequences, so this is not a lossless
// mapping back to NBT.
//
// Serializers recurse into nested values, so containers deeper than
// `MAX_SERIALIZE_DEPTH` fail with an error instead of exhausting the stack.

/// How many containers deep `Serialize` will go before giving up.
pub const MAX_SERIALIZE_DEPTH: usize = 128;

/// A value along with how many more containers may be opened beneath it.
struct Bounded<'a, T>(&'a T, usize);

fn too_deep<E: serde::ser::Error>() -> E {
    E::custom(format!(
        "nbt nested deeper than {} containers cannot be serialized",
        MAX_SERIALIZE_DEPTH
    ))
}

impl Serialize for Bounded<'_, Tag> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let Bounded(tag, room) = *self;
        match tag {
            Tag::Byte(v) => serializer.serialize_i8(*v),
            Tag::Short(v) => serializer.serialize_i16(*v),
            Tag::Int(v) => serializer.serialize_i32(*v),
            Tag::Long(v) => serializer.serialize_i64(*v),
            Tag::Float(v) => serializer.serialize_f32(*v),
            Tag::Double(v) => serializer.serialize_f64(*v),
            Tag::ByteArray(v) => v.serialize(serializer),
            Tag::String(v) => serializer.serialize_str(v),
            Tag::List(v) => Bounded(v, room).serialize(serializer),
            Tag::Compound(v) => Bounded(v, room).serialize(serializer),
            Tag::IntArray(v) => v.serialize(serializer),
            Tag::LongArray(v) => v.serialize(serializer),
        }
    }
}

impl Serialize for Bounded<'_, List> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let Bounded(list, room) = *self;
        if room == 0 {
            return Err(too_deep());
        }
        let mut seq = serializer.serialize_seq(Some(list.items.len()))?;
        for item in &list.items {
            seq.serialize_element(&Bounded(item, room - 1))?;
        }
        seq.end()
    }
}

impl Serialize for Bounded<'_, Compound> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let Bounded(compound, room) = *self;
        if room == 0 {
            return Err(too_deep());
        }
        let mut map = serializer.serialize_map(Some(compound.0.len()))?;
        for (k, v) in &compound.0 {
            map.serialize_entry(k, &Bounded(v, room - 1))?;
        }
        map.end()
    }
}

impl Serialize for Tag {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Bounded(self, MAX_SERIALIZE_DEPTH).serialize(serializer)
    }
}

impl Serialize for List {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Bounded(self, MAX_SERIALIZE_DEPTH).serialize(serializer)
    }
}

impl Serialize for Compound {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Bounded(self, MAX_SERIALIZE_DEPTH).serialize(serializer)
    }
}

impl Serialize for RootCompound {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.body.serialize(serializer)
    }
}

// ------------- From<T> impls -------------

macro_rules! from {
    ($type:ty, $variant:ident $(, $($part:tt)+)?) => {
        impl From<$type> for Tag {
            fn from(val: $type) -> Self {
                Self::$variant(val$($($part)+)?)
            }
        }
    };
}
from!(i8, Byte);
from!(u8, Byte, as i8);
from!(i16, Short);
from!(u16, Short, as i16);
from!(i32, Int);
from!(u32, Int, as i32);
from!(i64, Long);
from!(u64, Long, as i64);
from!(f32, Float);
from!(f64, Double);
from!(String, String);
from!(&str, String, .to_owned());
from!(Vec<i8>, ByteArray);
from!(Vec<i32>, IntArray);
from!(Vec<i64>, LongArray);
from!(List, List);
from!(Compound, Compound);

impl From<bool> for Tag {
    fn from(val: bool) -> Self {
        Self::Byte(i8::from(val))
    }
}
