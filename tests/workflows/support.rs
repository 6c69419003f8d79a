//! Shared fixture: two residences, a few stocked items, a pinned clock and
//! a buffered notifier.

use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use estatecare::notify::{LogNotifier, Notification};
use estatecare::{
    Actor, DocumentsExt, FixedClock, InMemoryDocumentStore, InventoryService,
    InventoryTransaction, Item, Residence, Role,
};

pub struct Fixture {
    pub store: InMemoryDocumentStore,
    pub inventory: InventoryService<InMemoryDocumentStore>,
    pub clock: Arc<FixedClock>,
    pub notifications: Arc<Mutex<Vec<Notification>>>,
}

impl Fixture {
    /// August 2025; `itm-filter` holds 10 at res-1, `itm-bulb` holds 4 at res-1
    /// and 6 at res-2.
    pub fn new() -> Self {
        let store = InMemoryDocumentStore::new();
        let residences = store.documents::<Residence>();
        residences.save(&Residence::new("res-1", "Tower A")).unwrap();
        residences.save(&Residence::new("res-2", "Tower B")).unwrap();

        let items = store.documents::<Item>();
        items
            .save(&Item::new("itm-filter", "Air filter", "فلتر هواء", "hvac", "pcs").with_stock("res-1", 10))
            .unwrap();
        items
            .save(
                &Item::new("itm-bulb", "LED bulb", "لمبة", "electrical", "pcs")
                    .with_stock("res-1", 4)
                    .with_stock("res-2", 6),
            )
            .unwrap();
        items
            .save(&Item::new("itm-valve", "Valve", "صمام", "plumbing", "pcs"))
            .unwrap();

        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2025, 8, 14, 9, 30, 0).unwrap(),
        ));
        let notifications = Arc::new(Mutex::new(Vec::new()));
        let inventory = InventoryService::new(store.clone())
            .with_clock(clock.clone())
            .with_notifier(Arc::new(LogNotifier::with_buffer(notifications.clone())));

        Self {
            store,
            inventory,
            clock,
            notifications,
        }
    }

    pub fn stock(&self, item_id: &str, residence_id: &str) -> i64 {
        self.item(item_id).stock_at(residence_id)
    }

    pub fn item(&self, item_id: &str) -> Item {
        self.store
            .documents::<Item>()
            .get(item_id)
            .unwrap()
            .unwrap()
            .data
    }

    pub fn log_rows(&self) -> Vec<InventoryTransaction> {
        self.store
            .documents::<InventoryTransaction>()
            .all()
            .unwrap()
            .into_iter()
            .map(|v| v.data)
            .collect()
    }

    pub fn rows_for(&self, reference: &str) -> Vec<InventoryTransaction> {
        self.log_rows()
            .into_iter()
            .filter(|row| row.reference == reference)
            .collect()
    }

    pub fn notified(&self) -> Vec<String> {
        self.notifications
            .lock()
            .unwrap()
            .iter()
            .map(|n| n.event.clone())
            .collect()
    }
}

pub fn admin() -> Actor {
    Actor::admin("admin-1")
}

pub fn manager(residences: &[&str]) -> Actor {
    Actor::new("manager-1", Role::Manager).with_residences(residences.iter().copied())
}

pub fn staff(residences: &[&str]) -> Actor {
    Actor::new("staff-1", Role::Staff).with_residences(residences.iter().copied())
}
