use crate::domain::merchant::MerchantId;
use crate::domain::order::Order;
use crate::domain::payment::Payment;
use crate::domain::ports::{OrderStore, PaymentStore};
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, IteratorMode, Options, WriteBatch};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Column Family for storing orders.
pub const CF_ORDERS: &str = "orders";
/// Column Family for storing payments.
pub const CF_PAYMENTS: &str = "payments";
/// Column Family mapping a big-endian insertion sequence number to a payment id.
pub const CF_PAYMENTS_SEQ: &str = "payments_seq";

/// A persistent store implementation using RocksDB.
///
/// Orders and payments live in separate Column Families, keyed by their
/// textual id and encoded as JSON. Every payment insert also records its
/// sequence number so listings can order payments created at the same
/// instant.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
    // Next payment sequence number. Holding it serializes check-then-write
    // sequences so inserts can detect conflicts.
    next_seq: Arc<Mutex<u64>>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families exist and resumes the
    /// payment sequence after the last recorded insert.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = [CF_ORDERS, CF_PAYMENTS, CF_PAYMENTS_SEQ]
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;
        let next_seq = match last_sequence(&db)? {
            Some(seq) => seq + 1,
            None => 0,
        };

        Ok(Self {
            db: Arc::new(db),
            next_seq: Arc::new(Mutex::new(next_seq)),
        })
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily> {
        column_family(&self.db, name)
    }

    fn read<T: DeserializeOwned>(&self, cf_name: &str, key: &str) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        match self.db.get_cf(cf, key.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn exists(&self, cf_name: &str, key: &str) -> Result<bool> {
        let cf = self.cf(cf_name)?;
        Ok(self.db.get_pinned_cf(cf, key.as_bytes())?.is_some())
    }

    fn write<T: Serialize>(&self, cf_name: &str, key: &str, value: &T) -> Result<()> {
        let cf = self.cf(cf_name)?;
        let bytes = serde_json::to_vec(value)?;
        self.db.put_cf(cf, key.as_bytes(), bytes)?;
        Ok(())
    }
}

fn column_family<'a>(db: &'a DB, name: &str) -> Result<&'a rocksdb::ColumnFamily> {
    db.cf_handle(name).ok_or_else(|| {
        GatewayError::IoError(std::io::Error::other(format!(
            "{name} column family not found"
        )))
    })
}

fn decode_seq(key: &[u8]) -> Result<u64> {
    let bytes: [u8; 8] = key.try_into().map_err(|_| {
        GatewayError::IoError(std::io::Error::other("malformed payment sequence key"))
    })?;
    Ok(u64::from_be_bytes(bytes))
}

fn last_sequence(db: &DB) -> Result<Option<u64>> {
    let cf = column_family(db, CF_PAYMENTS_SEQ)?;
    match db.iterator_cf(cf, IteratorMode::End).next() {
        Some(item) => {
            let (key, _id) = item?;
            Ok(Some(decode_seq(&key)?))
        }
        None => Ok(None),
    }
}

#[async_trait]
impl OrderStore for RocksDBStore {
    async fn insert(&self, order: Order) -> Result<()> {
        let _guard = self.next_seq.lock().await;
        if self.exists(CF_ORDERS, &order.id)? {
            return Err(GatewayError::Conflict(order.id));
        }
        self.write(CF_ORDERS, &order.id, &order)
    }

    async fn get(&self, order_id: &str) -> Result<Option<Order>> {
        self.read(CF_ORDERS, order_id)
    }
}

#[async_trait]
impl PaymentStore for RocksDBStore {
    async fn insert(&self, payment: Payment) -> Result<()> {
        let mut next_seq = self.next_seq.lock().await;
        if self.exists(CF_PAYMENTS, &payment.id)? {
            return Err(GatewayError::Conflict(payment.id));
        }

        // Record and sequence entry land together or not at all
        let mut batch = WriteBatch::default();
        batch.put_cf(
            self.cf(CF_PAYMENTS)?,
            payment.id.as_bytes(),
            serde_json::to_vec(&payment)?,
        );
        batch.put_cf(
            self.cf(CF_PAYMENTS_SEQ)?,
            next_seq.to_be_bytes(),
            payment.id.as_bytes(),
        );
        self.db.write(batch)?;

        *next_seq += 1;
        Ok(())
    }

    async fn update(&self, payment: Payment) -> Result<()> {
        let _guard = self.next_seq.lock().await;
        if !self.exists(CF_PAYMENTS, &payment.id)? {
            return Err(GatewayError::NotFound("Payment"));
        }
        self.write(CF_PAYMENTS, &payment.id, &payment)
    }

    async fn get(&self, payment_id: &str) -> Result<Option<Payment>> {
        self.read(CF_PAYMENTS, payment_id)
    }

    /// Newest `created_at` first; payments created at the same instant come
    /// back in reverse insertion order.
    async fn list_by_merchant(&self, merchant_id: MerchantId) -> Result<Vec<Payment>> {
        let cf = self.cf(CF_PAYMENTS_SEQ)?;

        let mut sequenced = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::End) {
            let (key, id) = item?;
            let id = String::from_utf8_lossy(&id);
            let Some(payment) = self.read::<Payment>(CF_PAYMENTS, &id)? else {
                continue;
            };
            if payment.merchant_id == merchant_id {
                sequenced.push((decode_seq(&key)?, payment));
            }
        }

        sequenced.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| seq_b.cmp(seq_a))
        });
        Ok(sequenced.into_iter().map(|(_, payment)| payment).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::OrderRequest;
    use crate::domain::payment::{Instrument, PaymentStatus};
    use chrono::{TimeDelta, Utc};
    use tempfile::tempdir;

    fn upi_payment(order: &Order) -> Payment {
        Payment::open(
            order,
            Instrument::Upi {
                vpa: "user@bank".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_rocksdb_open_cf() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).expect("Failed to open RocksDB");

        // Verify CFs exist
        assert!(store.db.cf_handle(CF_ORDERS).is_some());
        assert!(store.db.cf_handle(CF_PAYMENTS).is_some());
        assert!(store.db.cf_handle(CF_PAYMENTS_SEQ).is_some());
    }

    #[tokio::test]
    async fn test_rocksdb_order_store() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).unwrap();
        let order = Order::create(MerchantId::new(), OrderRequest::new(500));

        OrderStore::insert(&store, order.clone()).await.unwrap();

        let retrieved = OrderStore::get(&store, &order.id).await.unwrap().unwrap();
        assert_eq!(retrieved, order);
        assert!(OrderStore::get(&store, "order_missing").await.unwrap().is_none());

        let conflict = OrderStore::insert(&store, order).await;
        assert!(matches!(conflict, Err(GatewayError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_rocksdb_payment_store() {
        let dir = tempdir().unwrap();
        let store = RocksDBStore::open(dir.path()).unwrap();
        let merchant = MerchantId::new();
        let order = Order::create(merchant, OrderRequest::new(500));

        let mut payment = upi_payment(&order);
        PaymentStore::insert(&store, payment.clone()).await.unwrap();
        payment.settle(false).unwrap();
        PaymentStore::update(&store, payment.clone()).await.unwrap();

        let retrieved = PaymentStore::get(&store, &payment.id).await.unwrap().unwrap();
        assert_eq!(retrieved.status, PaymentStatus::Failed);

        let listed = store.list_by_merchant(merchant).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(store.list_by_merchant(MerchantId::new()).await.unwrap().is_empty());

        let duplicate = PaymentStore::insert(&store, payment).await;
        assert!(matches!(duplicate, Err(GatewayError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_rocksdb_list_orders_ties_by_insertion() {
        let dir = tempdir().unwrap();
        let merchant = MerchantId::new();
        let order = Order::create(merchant, OrderRequest::new(500));
        let created_at = Utc::now();
        let payment_with = |id: &str, created_at| {
            let mut payment = upi_payment(&order);
            payment.id = id.to_string();
            payment.created_at = created_at;
            payment
        };

        // Inserted first but created last, so it still lists first
        let late = payment_with("pay_late", created_at + TimeDelta::seconds(1));
        let ids = [
            "pay_z", "pay_a", "pay_m", "pay_b", "pay_y", "pay_c", "pay_x", "pay_d",
        ];
        {
            let store = RocksDBStore::open(dir.path()).unwrap();
            PaymentStore::insert(&store, late).await.unwrap();
            for id in &ids[..4] {
                PaymentStore::insert(&store, payment_with(*id, created_at))
                    .await
                    .unwrap();
            }
        }

        // The sequence resumes after a reopen
        let store = RocksDBStore::open(dir.path()).unwrap();
        for id in &ids[4..] {
            PaymentStore::insert(&store, payment_with(*id, created_at))
                .await
                .unwrap();
        }

        let listed: Vec<String> = store
            .list_by_merchant(merchant)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(
            listed,
            vec![
                "pay_late", "pay_d", "pay_x", "pay_c", "pay_y", "pay_b", "pay_m", "pay_a",
                "pay_z",
            ]
        );
    }

    #[tokio::test]
    async fn test_rocksdb_reopen_keeps_data() {
        let dir = tempdir().unwrap();
        let order = Order::create(MerchantId::new(), OrderRequest::new(500));
        {
            let store = RocksDBStore::open(dir.path()).unwrap();
            OrderStore::insert(&store, order.clone()).await.unwrap();
        }

        let store = RocksDBStore::open(dir.path()).unwrap();
        let retrieved = OrderStore::get(&store, &order.id).await.unwrap();
        assert_eq!(retrieved, Some(order));
    }
}
