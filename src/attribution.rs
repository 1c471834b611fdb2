use log::debug;

use crate::interval::{merge_union, subtract_union};
use crate::models::{AttributedSegment, Card, TimeInterval};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attribution {
    /// Time claimed by non-System cards, sorted and disjoint.
    pub primary_union: Vec<TimeInterval>,
    pub primary_segments: Vec<AttributedSegment>,
    /// Empty unless System cards were included.
    pub system_segments: Vec<AttributedSegment>,
    /// Both layers combined, ordered by `(start_ts, card_id)`.
    pub segments: Vec<AttributedSegment>,
}

/// Attribute one layer of cards against `union`, extending it with every claim.
pub fn attribute_layer(cards: &[&Card], union: &mut Vec<TimeInterval>) -> Vec<AttributedSegment> {
    let mut ordered: Vec<&Card> = cards.to_vec();
    ordered.sort_by_key(|card| (card.start_ts, card.id));

    let mut segments = Vec::new();
    for card in ordered {
        let pieces = subtract_union(card.interval(), union);
        if pieces.is_empty() {
            debug!("card {} fully eclipsed", card.id);
            continue;
        }

        segments.extend(pieces.iter().map(|piece| AttributedSegment {
            start_ts: piece.start_ts,
            end_ts: piece.end_ts,
            category: card.category.clone(),
            title: card.title.clone(),
            card_id: card.id,
        }));

        let mut grown = std::mem::take(union);
        grown.extend(pieces);
        *union = merge_union(&grown);
    }

    sort_segments(&mut segments);
    segments
}

pub fn attribute_cards(cards: &[Card]) -> Vec<AttributedSegment> {
    let refs: Vec<&Card> = cards.iter().collect();
    attribute_layer(&refs, &mut Vec::new())
}

/// Attribute non-System cards first, then optionally let System cards fill
/// whatever gaps remain.
pub fn attribute(cards: &[Card], include_system: bool) -> Attribution {
    let (system, primary): (Vec<&Card>, Vec<&Card>) =
        cards.iter().partition(|card| card.is_system());

    let mut union = Vec::new();
    let primary_segments = attribute_layer(&primary, &mut union);
    let primary_union = union.clone();

    let system_segments = if include_system {
        attribute_layer(&system, &mut union)
    } else {
        Vec::new()
    };

    let mut segments: Vec<AttributedSegment> = primary_segments
        .iter()
        .chain(system_segments.iter())
        .cloned()
        .collect();
    sort_segments(&mut segments);

    Attribution {
        primary_union,
        primary_segments,
        system_segments,
        segments,
    }
}

fn sort_segments(segments: &mut [AttributedSegment]) {
    segments.sort_by_key(|segment| (segment.start_ts, segment.card_id));
}
