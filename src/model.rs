//! Board store: the applied character set and every card's live position.
//! Owned by the app root and changed only through `BoardAction`s.

use std::collections::BTreeMap;
use std::rc::Rc;
use yew::Reducible;

use crate::card::{CardKey, CardRecord};
use crate::charsets::{Catalog, CharacterSet};
use crate::constants::SIZE;
use crate::geometry::Point;

/// One card per non-empty cell, laid out so the matrix is centred on the origin.
pub fn initialize_card_positions(matrix: &[Vec<Option<String>>]) -> BTreeMap<CardKey, CardRecord> {
    let rows = matrix.len();
    let cols = matrix.first().map(Vec::len).unwrap_or(0);
    let center_row = rows.saturating_sub(1) / 2;
    let center_col = cols.saturating_sub(1) / 2;
    let mut cards = BTreeMap::new();
    for (row, cells) in matrix.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            let Some(glyph) = cell.as_deref().filter(|g| !g.is_empty()) else {
                continue;
            };
            let key = CardKey { row, col };
            cards.insert(
                key,
                CardRecord {
                    key,
                    x: (col as f64 - center_col as f64) * SIZE,
                    y: (row as f64 - center_row as f64) * SIZE,
                    glyph: glyph.to_string(),
                },
            );
        }
    }
    cards
}

#[derive(Clone, Debug, PartialEq)]
pub struct BoardState {
    catalog: Rc<Catalog>,
    pub applied_id: String,
    pub cards: BTreeMap<CardKey, CardRecord>,
    /// Back to front.
    pub paint_order: Vec<CardKey>,
    /// Bumped on every effective change.
    pub version: u64,
}

impl BoardState {
    pub fn new(catalog: Catalog) -> Self {
        let id = catalog.default_set().id.clone();
        Self::with_applied(catalog, &id)
    }

    /// Starts on `applied_id`, or on the catalog default when it doesn't resolve.
    pub fn with_applied(catalog: Catalog, applied_id: &str) -> Self {
        let set = catalog
            .get(applied_id)
            .unwrap_or_else(|| catalog.default_set());
        let applied_id = set.id.clone();
        let cards = initialize_card_positions(&set.matrix);
        let paint_order = cards.keys().copied().collect();
        Self {
            catalog: Rc::new(catalog),
            applied_id,
            cards,
            paint_order,
            version: 0,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn current_char_set(&self) -> &CharacterSet {
        self.catalog
            .get(&self.applied_id)
            .unwrap_or_else(|| self.catalog.default_set())
    }

    pub fn cards_back_to_front(&self) -> impl Iterator<Item = &CardRecord> {
        self.paint_order.iter().filter_map(|k| self.cards.get(k))
    }

    /// Topmost card under a world-space point.
    pub fn card_at(&self, p: Point) -> Option<&CardRecord> {
        self.paint_order
            .iter()
            .rev()
            .filter_map(|k| self.cards.get(k))
            .find(|c| c.contains(p))
    }
}

#[derive(Clone, Debug)]
pub enum BoardAction {
    /// Discards every card position and lays out the named set afresh.
    ApplyCharSet(String),
    MoveCard { key: CardKey, position: Point },
    RaiseCard(CardKey),
}

impl Reducible for BoardState {
    type Action = BoardAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use BoardAction::*;
        let mut new = (*self).clone();
        match action {
            ApplyCharSet(id) => {
                let Some(set) = new.catalog.get(&id) else {
                    log::warn!("character set `{id}` not found; keeping current board");
                    return self;
                };
                new.cards = initialize_card_positions(&set.matrix);
                new.paint_order = new.cards.keys().copied().collect();
                new.applied_id = id;
                log::info!("applied character set `{}` ({} cards)", new.applied_id, new.cards.len());
            }
            MoveCard { key, position } => {
                let Some(card) = new.cards.get_mut(&key) else {
                    return self;
                };
                if card.position() == position {
                    return self;
                }
                card.x = position.x;
                card.y = position.y;
            }
            RaiseCard(key) => {
                if new.paint_order.last() == Some(&key) {
                    return self;
                }
                let Some(idx) = new.paint_order.iter().position(|k| *k == key) else {
                    return self;
                };
                new.paint_order.remove(idx);
                new.paint_order.push(key);
            }
        }
        new.version = new.version.wrapping_add(1);
        Rc::new(new)
    }
}
