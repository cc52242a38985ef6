use crate::db::*;
use crate::test_helpers::{create_test_db, sample_record};
use crate::types::DealMonth;


fn march_2024() -> DealMonth {
    DealMonth::new(2024, 3).unwrap()
}

/// Insert `records` in one committed transaction, returning how many were new
async fn insert_committed(db: &Database, records: &[crate::types::TradeRecord]) -> u64 {
    let mut tx = db.begin().await.unwrap();
    let mut inserted = 0;
    for record in records {
        if tx.insert_if_absent(record).await.unwrap() {
            inserted += 1;
        }
    }
    tx.commit().await.unwrap();
    inserted
}
