// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Huang Rui <vowstar@gmail.com>

//! `.kicad_pcb` adapter
//!
//! Implements the board collaborator on top of the raw S-expression tree.
//! Only footprint placement (`at`, `layer`, lock state, reference, id), groups
//! and the aux origin are interpreted; every other node is written back as it
//! was read.

use std::fs;
use std::path::Path;

use crate::board::{Board, Footprint, Vec2I};
use crate::error::{Error, Result};
use sexpr::{format_number, SExpr};

const FOOTPRINT_TAGS: [&str; 2] = ["footprint", "module"];

/// Child items whose `at` angle KiCad stores as an absolute board angle
const ANGLED_CHILDREN: [&str; 3] = ["pad", "fp_text", "property"];

/// Coordinate nodes expressed in the footprint's local frame
const LOCAL_COORDINATE_TAGS: [&str; 7] = ["at", "start", "end", "center", "mid", "xy", "offset"];

/// Wrap into (-180, 180]
fn normalize_angle(degrees: f64) -> f64 {
    let mut angle = degrees % 360.0;
    if angle > 180.0 {
        angle -= 360.0;
    } else if angle <= -180.0 {
        angle += 360.0;
    }
    angle
}

fn is_number(expr: Option<&SExpr>) -> bool {
    expr.and_then(SExpr::as_text)
        .is_some_and(|text| text.parse::<f64>().is_ok())
}

/// Write the angle of an `(at x y [angle] ...)` node, omitting it when zero
fn set_at_angle(at: &mut SExpr, degrees: f64) {
    let Some(items) = at.as_list_mut() else {
        return;
    };
    let has_angle = is_number(items.get(3));
    let angle = normalize_angle(degrees);

    if angle == 0.0 {
        if has_angle {
            items.remove(3);
        }
    } else if has_angle {
        items[3] = SExpr::Atom(format_number(angle));
    } else {
        let index = items.len().min(3);
        items.insert(index, SExpr::Atom(format_number(angle)));
    }
}

/// `F.Cu` <-> `B.Cu`, `F.SilkS` <-> `B.SilkS`, ...; other names unchanged
fn swap_side_prefix(layer: &str) -> Option<String> {
    if let Some(rest) = layer.strip_prefix("F.") {
        Some(format!("B.{rest}"))
    } else {
        layer.strip_prefix("B.").map(|rest| format!("F.{rest}"))
    }
}

fn swap_layers(node: &mut SExpr) {
    if !(node.is_tag("layer") || node.is_tag("layers")) {
        return;
    }
    for arg in node.args_mut() {
        match arg {
            SExpr::Atom(text) | SExpr::Str(text) => {
                if let Some(swapped) = swap_side_prefix(text) {
                    *text = swapped;
                }
            }
            SExpr::List(_) => {}
        }
    }
}

fn mirror_local_y(node: &mut SExpr) {
    let is_coordinate = LOCAL_COORDINATE_TAGS
        .iter()
        .any(|tag| node.is_tag(tag));
    if !is_coordinate {
        return;
    }
    if let Some(y) = node.f64_at(1) {
        node.set_arg(1, SExpr::Atom(format_number(-y)));
    }
}

/// Toggle `mirror` in `(effects ... (justify ...))`
fn toggle_text_mirror(text: &mut SExpr) {
    let Some(effects) = text.find_mut("effects") else {
        return;
    };
    match effects.find_mut("justify") {
        Some(justify) if justify.has_atom("mirror") => {
            justify.retain(|item| !matches!(item, SExpr::Atom(atom) if atom == "mirror"));
            if justify.args().is_empty() {
                effects.retain(|item| !item.is_tag("justify"));
            }
        }
        Some(justify) => justify.push(SExpr::atom("mirror")),
        None => effects.push(SExpr::node("justify", &["mirror"])),
    }
}

/// How a board file identifies footprints and groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IdStyle {
    /// KiCad 8+: `(uuid "...")`, groups use quoted members
    Uuid,
    /// KiCad 6/7: `(tstamp ...)`, groups use `(id ...)`
    Tstamp,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KicadFootprint {
    node: SExpr,
}

impl KicadFootprint {
    pub fn node(&self) -> &SExpr {
        &self.node
    }

    fn id(&self) -> Option<&str> {
        self.node
            .find("uuid")
            .or_else(|| self.node.find("tstamp"))
            .and_then(|id| id.text_at(0))
    }

    fn id_style(&self) -> Option<IdStyle> {
        if self.node.find("uuid").is_some() {
            Some(IdStyle::Uuid)
        } else if self.node.find("tstamp").is_some() {
            Some(IdStyle::Tstamp)
        } else {
            None
        }
    }

    /// Footprint id, creating one when the footprint has none
    fn ensure_id(&mut self, style: IdStyle) -> String {
        if let Some(id) = self.id() {
            return id.to_string();
        }
        let id = uuid::Uuid::new_v4().to_string();
        let node = match style {
            IdStyle::Uuid => SExpr::List(vec![SExpr::atom("uuid"), SExpr::string(&id)]),
            IdStyle::Tstamp => SExpr::node("tstamp", &[id.as_str()]),
        };
        self.node.push(node);
        id
    }

    fn ensure_at(&mut self) {
        if self.node.find("at").is_none() {
            self.node.push(SExpr::node("at", &["0", "0"]));
        }
    }

    fn set_angle(&mut self, degrees: f64) {
        self.ensure_at();
        if let Some(at) = self.node.find_mut("at") {
            set_at_angle(at, degrees);
        }
    }

    /// Apply `f` to the absolute angle of every pad and text of the footprint
    fn map_child_angles<F: Fn(f64) -> f64>(&mut self, f: F) {
        for child in self.node.children_mut() {
            if !ANGLED_CHILDREN.iter().any(|tag| child.is_tag(tag)) {
                continue;
            }
            if let Some(at) = child.find_mut("at") {
                let angle = if is_number(at.args().get(2)) {
                    at.f64_at(2).unwrap_or(0.0)
                } else {
                    0.0
                };
                set_at_angle(at, f(angle));
            }
        }
    }
}

impl Footprint for KicadFootprint {
    fn reference(&self) -> &str {
        self.node
            .children()
            .find_map(|child| match child.tag()? {
                "property" if child.text_at(0) == Some("Reference") => child.text_at(1),
                "fp_text" if child.text_at(0) == Some("reference") => child.text_at(1),
                _ => None,
            })
            .unwrap_or("")
    }

    fn is_locked(&self) -> bool {
        self.node.has_atom("locked")
            || self
                .node
                .find("locked")
                .is_some_and(|locked| locked.text_at(0) == Some("yes"))
    }

    fn layer_name(&self) -> &str {
        self.node
            .find("layer")
            .and_then(|layer| layer.text_at(0))
            .unwrap_or("")
    }

    fn position(&self) -> Vec2I {
        let at = self.node.find("at");
        Vec2I::from_mm(
            at.and_then(|at| at.f64_at(0)).unwrap_or(0.0),
            at.and_then(|at| at.f64_at(1)).unwrap_or(0.0),
        )
    }

    fn orientation_degrees(&self) -> f64 {
        self.node
            .find("at")
            .filter(|at| is_number(at.args().get(2)))
            .and_then(|at| at.f64_at(2))
            .unwrap_or(0.0)
    }

    fn set_position(&mut self, position: Vec2I) {
        let (x, y) = position.to_mm();
        self.ensure_at();
        if let Some(at) = self.node.find_mut("at") {
            at.set_arg(0, SExpr::Atom(format_number(x)));
            at.set_arg(1, SExpr::Atom(format_number(y)));
        }
    }

    fn set_orientation_degrees(&mut self, degrees: f64) {
        let delta = degrees - self.orientation_degrees();
        self.set_angle(degrees);
        self.map_child_angles(|angle| angle + delta);
    }

    fn flip_left_right(&mut self) {
        let orientation = self.orientation_degrees();

        self.node.walk_mut(&mut swap_layers);
        for child in self.node.children_mut() {
            if child.is_tag("at") {
                continue;
            }
            child.walk_mut(&mut mirror_local_y);
            if child.is_tag("fp_text") || child.is_tag("property") {
                toggle_text_mirror(child);
            }
        }

        self.set_angle(180.0 - orientation);
        self.map_child_angles(|angle| 180.0 - angle);
    }
}

#[derive(Debug, Clone, PartialEq)]
enum BoardItem {
    Node(SExpr),
    Footprint(KicadFootprint),
}

impl BoardItem {
    fn into_sexpr(self) -> SExpr {
        match self {
            BoardItem::Node(node) => node,
            BoardItem::Footprint(footprint) => footprint.node,
        }
    }

    fn as_node(&self) -> Option<&SExpr> {
        match self {
            BoardItem::Node(node) => Some(node),
            BoardItem::Footprint(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KicadBoard {
    items: Vec<BoardItem>,
}

impl KicadBoard {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading board: {}", path.display());
        let content = fs::read_to_string(path)?;
        let board = Self::parse(&content)?;
        log::info!(
            "Loaded {} with {} footprints",
            path.display(),
            board.footprint_count()
        );
        Ok(board)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let root = sexpr::parse(content).map_err(Error::BoardParse)?;
        if !root.is_tag("kicad_pcb") {
            return Err(Error::BoardParse(format!(
                "expected kicad_pcb, found {}",
                root.tag().unwrap_or("<none>")
            )));
        }

        let items = root
            .args()
            .iter()
            .map(|item| {
                if FOOTPRINT_TAGS.iter().any(|tag| item.is_tag(tag)) {
                    BoardItem::Footprint(KicadFootprint { node: item.clone() })
                } else {
                    BoardItem::Node(item.clone())
                }
            })
            .collect();

        Ok(Self { items })
    }

    pub fn to_sexpr(&self) -> SExpr {
        let mut items = vec![SExpr::atom("kicad_pcb")];
        items.extend(self.items.iter().cloned().map(BoardItem::into_sexpr));
        SExpr::List(items)
    }

    pub fn to_sexpr_string(&self) -> String {
        sexpr::write(&self.to_sexpr())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_sexpr_string())?;
        log::info!("Saved board to {}", path.display());
        Ok(())
    }

    pub fn footprints(&self) -> impl Iterator<Item = &KicadFootprint> {
        self.items.iter().filter_map(|item| match item {
            BoardItem::Footprint(footprint) => Some(footprint),
            BoardItem::Node(_) => None,
        })
    }

    fn footprints_mut(&mut self) -> impl Iterator<Item = &mut KicadFootprint> {
        self.items.iter_mut().filter_map(|item| match item {
            BoardItem::Footprint(footprint) => Some(footprint),
            BoardItem::Node(_) => None,
        })
    }

    pub fn footprint_count(&self) -> usize {
        self.footprints().count()
    }

    /// Every `(group ...)` node of the board
    pub fn groups(&self) -> impl Iterator<Item = &SExpr> {
        self.items
            .iter()
            .filter_map(BoardItem::as_node)
            .filter(|node| node.is_tag("group"))
    }

    fn id_style(&self) -> IdStyle {
        self.footprints()
            .find_map(KicadFootprint::id_style)
            .unwrap_or(IdStyle::Uuid)
    }
}

impl Board for KicadBoard {
    type Footprint = KicadFootprint;

    fn find_footprint_by_reference(&self, refdes: &str) -> Option<&KicadFootprint> {
        self.footprints().find(|fp| fp.reference() == refdes)
    }

    fn find_footprint_by_reference_mut(&mut self, refdes: &str) -> Option<&mut KicadFootprint> {
        self.footprints_mut().find(|fp| fp.reference() == refdes)
    }

    fn add_group(&mut self, name: &str, references: &[&str]) -> usize {
        let style = self.id_style();
        let mut members = Vec::new();
        for refdes in references {
            if let Some(footprint) = self.find_footprint_by_reference_mut(refdes) {
                members.push(footprint.ensure_id(style));
            }
        }
        let added = members.len();

        let group_id = uuid::Uuid::new_v4().to_string();
        let mut group = vec![SExpr::atom("group"), SExpr::string(name)];
        let mut member_list = vec![SExpr::atom("members")];
        match style {
            IdStyle::Uuid => {
                group.push(SExpr::List(vec![
                    SExpr::atom("uuid"),
                    SExpr::string(&group_id),
                ]));
                member_list.extend(members.iter().map(|id| SExpr::string(id)));
            }
            IdStyle::Tstamp => {
                group.push(SExpr::node("id", &[group_id.as_str()]));
                member_list.extend(members.iter().map(|id| SExpr::atom(id)));
            }
        }
        group.push(SExpr::List(member_list));
        self.items.push(BoardItem::Node(SExpr::List(group)));

        log::debug!("Group {name:?} created with {added} members");
        added
    }

    fn group_count(&self) -> usize {
        self.groups().count()
    }

    fn aux_origin(&self) -> Vec2I {
        let origin = self
            .items
            .iter()
            .filter_map(BoardItem::as_node)
            .find(|node| node.is_tag("setup"))
            .and_then(|setup| setup.find("aux_axis_origin"));
        Vec2I::from_mm(
            origin.and_then(|o| o.f64_at(0)).unwrap_or(0.0),
            origin.and_then(|o| o.f64_at(1)).unwrap_or(0.0),
        )
    }
}

pub mod sexpr;
