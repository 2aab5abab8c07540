use std::collections::HashMap;

use crate::domain::{ContentItem, Fingerprint};

use super::hasher::fingerprint;

/// Items sharing one fingerprint. The first member is the representative
/// whose uri identifies the group on the wire.
#[derive(Debug, Clone)]
pub struct ContentGroup<'a> {
    pub fingerprint: Fingerprint,
    pub members: Vec<&'a ContentItem>,
    /// Index of each member in the input slice.
    pub positions: Vec<usize>,
}

impl<'a> ContentGroup<'a> {
    pub fn representative(&self) -> &'a ContentItem {
        self.members[0]
    }

    pub fn text(&self) -> &'a str {
        &self.representative().plain_content
    }
}

/// Groups in first-seen order.
pub fn group_items(items: &[ContentItem]) -> Vec<ContentGroup<'_>> {
    let mut groups: Vec<ContentGroup<'_>> = Vec::new();
    let mut index: HashMap<Fingerprint, usize> = HashMap::new();

    for (position, item) in items.iter().enumerate() {
        let fp = fingerprint(&item.plain_content);
        match index.get(&fp) {
            Some(&slot) => {
                let group = &mut groups[slot];
                group.members.push(item);
                group.positions.push(position);
            }
            None => {
                index.insert(fp.clone(), groups.len());
                groups.push(ContentGroup {
                    fingerprint: fp,
                    members: vec![item],
                    positions: vec![position],
                });
            }
        }
    }
    groups
}
