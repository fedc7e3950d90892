use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
    pub const fn with_a(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
}

impl From<Color> for bevy::prelude::Color {
    #[inline]
    fn from(c: Color) -> Self {
        bevy::prelude::Color::linear_rgba(c.r, c.g, c.b, c.a)
    }
}

/// Curve colors, assigned cyclically in creation order.
pub const PALETTE: [Color; 8] = [
    Color::rgb(0.906, 0.298, 0.235), // red
    Color::rgb(0.180, 0.800, 0.443), // green
    Color::rgb(0.204, 0.596, 0.859), // blue
    Color::rgb(0.953, 0.612, 0.071), // orange
    Color::rgb(0.608, 0.349, 0.714), // purple
    Color::rgb(0.102, 0.737, 0.612), // teal
    Color::rgb(0.902, 0.494, 0.133), // carrot
    Color::rgb(0.204, 0.286, 0.368), // slate
];

#[derive(Clone, Copy, Hash, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct CurveId(pub u64);

impl Default for CurveId {
    fn default() -> Self {
        static CTR: AtomicU32 = AtomicU32::new(1);
        Self(CTR.fetch_add(1, Ordering::Relaxed).into())
    }
}

impl CurveId {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurveKind {
    Plain,
    Derivative,
    Reciprocal,
    Primitive,
}

/// The compiled evaluator of a plain curve.
pub type Callable = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// How a curve produces values: its own callable, or a numerical
/// composition over a source curve. Derived variants hold no evaluation
/// state of their own; they re-evaluate their source on every call.
#[derive(Clone)]
pub enum CurveDef {
    Plain(Callable),
    Derivative(Arc<Curve>),
    Reciprocal(Arc<Curve>),
    Primitive(Arc<Curve>),
}

/// A plottable function: a definition plus display/identity metadata.
/// Immutable after creation.
#[derive(Clone)]
pub struct Curve {
    pub id: CurveId,
    pub equation: String,
    pub color: Color,
    pub def: CurveDef,
}

impl Curve {
    pub fn plain(equation: impl Into<String>, f: Callable, color: Color) -> Self {
        Self {
            id: CurveId::new(),
            equation: equation.into(),
            color,
            def: CurveDef::Plain(f),
        }
    }

    pub fn derivative(source: &Arc<Curve>, color: Color) -> Self {
        Self {
            id: CurveId::new(),
            equation: format!("{}'", source.equation),
            color,
            def: CurveDef::Derivative(source.clone()),
        }
    }

    pub fn reciprocal(source: &Arc<Curve>, color: Color) -> Self {
        Self {
            id: CurveId::new(),
            equation: format!("1/({})", source.equation),
            color,
            def: CurveDef::Reciprocal(source.clone()),
        }
    }

    pub fn primitive(source: &Arc<Curve>, color: Color) -> Self {
        Self {
            id: CurveId::new(),
            equation: format!("∫{}dx", source.equation),
            color,
            def: CurveDef::Primitive(source.clone()),
        }
    }

    pub fn kind(&self) -> CurveKind {
        match self.def {
            CurveDef::Plain(_) => CurveKind::Plain,
            CurveDef::Derivative(_) => CurveKind::Derivative,
            CurveDef::Reciprocal(_) => CurveKind::Reciprocal,
            CurveDef::Primitive(_) => CurveKind::Primitive,
        }
    }

    pub fn source(&self) -> Option<&Arc<Curve>> {
        match &self.def {
            CurveDef::Plain(_) => None,
            CurveDef::Derivative(s) | CurveDef::Reciprocal(s) | CurveDef::Primitive(s) => Some(s),
        }
    }
}

impl std::fmt::Debug for Curve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Curve")
            .field("id", &self.id)
            .field("equation", &self.equation)
            .field("kind", &self.kind())
            .finish()
    }
}

/// Ordered collection of curves with at-most-one selection and cyclic
/// palette assignment.
#[derive(Clone, Default)]
pub struct CurveSet {
    curves: Vec<Arc<Curve>>,
    selected: Option<CurveId>,
    palette_index: usize,
}

impl CurveSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next palette color, advancing the cycle.
    pub fn next_color(&mut self) -> Color {
        let color = PALETTE[self.palette_index % PALETTE.len()];
        self.palette_index += 1;
        color
    }

    pub fn push(&mut self, curve: Curve) -> Arc<Curve> {
        let curve = Arc::new(curve);
        self.curves.push(curve.clone());
        curve
    }

    pub fn remove(&mut self, id: CurveId) {
        self.curves.retain(|c| c.id != id);
        if self.selected == Some(id) {
            self.selected = None;
        }
    }

    pub fn clear(&mut self) {
        self.curves.clear();
        self.selected = None;
    }

    pub fn toggle_select(&mut self, id: CurveId) {
        if self.curves.iter().all(|c| c.id != id) {
            return;
        }
        self.selected = if self.selected == Some(id) {
            None
        } else {
            Some(id)
        };
    }

    pub fn selected_curve(&self) -> Option<&Arc<Curve>> {
        let id = self.selected?;
        self.curves.iter().find(|c| c.id == id)
    }

    pub fn is_selected(&self, id: CurveId) -> bool {
        self.selected == Some(id)
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Curve>> {
        self.curves.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Curve>> {
        self.curves.iter()
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Append a derived curve over the current selection, tagged with its
    /// calculus relationship and given the next palette color. No-op when
    /// nothing is selected or for `CurveKind::Plain`.
    pub fn derive_selected(&mut self, kind: CurveKind) -> Option<Arc<Curve>> {
        let source = self.selected_curve()?.clone();
        let color = self.next_color();
        let curve = match kind {
            CurveKind::Derivative => Curve::derivative(&source, color),
            CurveKind::Reciprocal => Curve::reciprocal(&source, color),
            CurveKind::Primitive => Curve::primitive(&source, color),
            CurveKind::Plain => return None,
        };
        Some(self.push(curve))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(value: f64) -> Curve {
        Curve::plain(format!("{value}"), Arc::new(move |_| value), PALETTE[0])
    }

    #[test]
    fn palette_cycles() {
        let mut set = CurveSet::new();
        let first = set.next_color();
        for _ in 0..PALETTE.len() - 1 {
            set.next_color();
        }
        assert_eq!(set.next_color(), first);
    }

    #[test]
    fn ids_are_unique() {
        let a = constant(1.0);
        let b = constant(1.0);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn selection_toggles_and_clears_on_remove() {
        let mut set = CurveSet::new();
        let curve = set.push(constant(1.0));

        set.toggle_select(curve.id);
        assert!(set.is_selected(curve.id));

        set.toggle_select(curve.id);
        assert!(set.selected_curve().is_none());

        set.toggle_select(curve.id);
        set.remove(curve.id);
        assert!(set.selected_curve().is_none());
        assert!(set.is_empty());
    }

    #[test]
    fn derive_selected_tags_kind_and_source() {
        let mut set = CurveSet::new();
        let base = set.push(constant(2.0));
        set.toggle_select(base.id);

        let derived = set.derive_selected(CurveKind::Derivative).unwrap();
        assert_eq!(derived.kind(), CurveKind::Derivative);
        assert_eq!(derived.source().unwrap().id, base.id);
        assert_eq!(derived.equation, "2'");

        let reciprocal = set.derive_selected(CurveKind::Reciprocal).unwrap();
        assert_eq!(reciprocal.equation, "1/(2)");

        let primitive = set.derive_selected(CurveKind::Primitive).unwrap();
        assert_eq!(primitive.equation, "∫2dx");

        assert_eq!(set.len(), 4);
    }

    #[test]
    fn derive_without_selection_is_noop() {
        let mut set = CurveSet::new();
        set.push(constant(1.0));
        assert!(set.derive_selected(CurveKind::Derivative).is_none());
        assert_eq!(set.len(), 1);
    }
}
