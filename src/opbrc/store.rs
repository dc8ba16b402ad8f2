use super::datastore::{DataStoreReadOnly, DataStoreReadWrite};
use super::types::{unix_now, AddressMintTimes, InscriptionExt, MarketPlaceTx, TempTx};
use super::params::{CHAIN_LITERAL, PROTOCOL_LITERAL};
use redb::{Database, ReadableTable, TableDefinition};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

const INSCRIPTION_EXT: TableDefinition<&str, &[u8]> =
  TableDefinition::new("OPBRC_INSCRIPTION_EXT");
const ADDRESS_MINT_TIMES: TableDefinition<&str, &[u8]> =
  TableDefinition::new("OPBRC_ADDRESS_MINT_TIMES");
const MARKET_PLACE_TX: TableDefinition<&str, &[u8]> =
  TableDefinition::new("OPBRC_MARKET_PLACE_TX");
const TEMP_TX: TableDefinition<&str, &[u8]> = TableDefinition::new("OPBRC_TEMP_TX");

fn tick_address_key(tick: &str, address: &str) -> String {
  format!("{}_{}", tick.to_lowercase(), address.to_lowercase())
}

// Zero-padded block height and tx index keep range scans in the order the
// driver delivered the txs.
fn temp_tx_key(tick: &str, block_height: u64, tx_index: u32, tx_hash: &str) -> String {
  format!(
    "{}_{:0>20}_{:0>10}_{}",
    tick.to_lowercase(),
    block_height,
    tx_index,
    tx_hash.to_lowercase()
  )
}

fn temp_tx_range_start(tick: &str, block_height: u64) -> String {
  format!("{}_{:0>20}", tick.to_lowercase(), block_height)
}

fn temp_tx_range_end(tick: &str, block_height: u64) -> String {
  // '~' sorts above every key character, closing the range just past the
  // last entry of `block_height`.
  format!("{}_{:0>20}~", tick.to_lowercase(), block_height)
}

/// redb-backed implementation of the engine's persistence. Every call is
/// its own transaction; the settlement flushes batch all their rows into
/// one write transaction per call.
pub struct DataStore {
  db: Database,
}

impl DataStore {
  pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
    Self::init_tables(Database::create(path)?)
  }

  /// In-memory store, handy for tests and dry runs.
  pub fn memory() -> anyhow::Result<Self> {
    Self::init_tables(
      Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?,
    )
  }

  fn init_tables(db: Database) -> anyhow::Result<Self> {
    let wtx = db.begin_write()?;
    wtx.open_table(INSCRIPTION_EXT)?;
    wtx.open_table(ADDRESS_MINT_TIMES)?;
    wtx.open_table(MARKET_PLACE_TX)?;
    wtx.open_table(TEMP_TX)?;
    wtx.commit()?;
    Ok(Self { db })
  }

  fn update_inscription_ext_with(
    &self,
    tick: &str,
    update: impl FnOnce(&mut InscriptionExt),
  ) -> Result<(), redb::Error> {
    let key = tick.to_lowercase();
    let wtx = self.db.begin_write()?;
    {
      let mut table = wtx.open_table(INSCRIPTION_EXT)?;
      let existing = table
        .get(key.as_str())?
        .map(|v| bincode::deserialize::<InscriptionExt>(v.value()).unwrap());
      if let Some(mut ext) = existing {
        update(&mut ext);
        ext.updated_at = unix_now();
        table.insert(key.as_str(), bincode::serialize(&ext).unwrap().as_slice())?;
      }
    }
    wtx.commit()?;
    Ok(())
  }
}

impl fmt::Debug for DataStore {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("DataStore").finish_non_exhaustive()
  }
}

impl DataStoreReadOnly for DataStore {
  type Error = redb::Error;

  fn get_inscription_ext(&self, tick: &str) -> Result<Option<InscriptionExt>, Self::Error> {
    let rtx = self.db.begin_read()?;
    let table = rtx.open_table(INSCRIPTION_EXT)?;
    let result = table
      .get(tick.to_lowercase().as_str())?
      .map(|v| bincode::deserialize::<InscriptionExt>(v.value()).unwrap());
    Ok(result)
  }

  fn list_inscription_exts(&self) -> Result<Vec<InscriptionExt>, Self::Error> {
    let rtx = self.db.begin_read()?;
    let table = rtx.open_table(INSCRIPTION_EXT)?;
    let mut exts = Vec::new();
    for entry in table.iter()? {
      let (_, value) = entry?;
      exts.push(bincode::deserialize::<InscriptionExt>(value.value()).unwrap());
    }
    Ok(exts)
  }

  fn list_not_settled_exts(&self) -> Result<Vec<InscriptionExt>, Self::Error> {
    Ok(
      self
        .list_inscription_exts()?
        .into_iter()
        .filter(|ext| ext.progress == 0)
        .collect(),
    )
  }

  fn list_address_mint_times(&self) -> Result<Vec<AddressMintTimes>, Self::Error> {
    let rtx = self.db.begin_read()?;
    let table = rtx.open_table(ADDRESS_MINT_TIMES)?;
    let mut rows = Vec::new();
    for entry in table.iter()? {
      let (_, value) = entry?;
      rows.push(bincode::deserialize::<AddressMintTimes>(value.value()).unwrap());
    }
    Ok(rows)
  }

  fn get_market_tx(&self, tx_hash: &str) -> Result<Option<MarketPlaceTx>, Self::Error> {
    let rtx = self.db.begin_read()?;
    let table = rtx.open_table(MARKET_PLACE_TX)?;
    let result = table
      .get(tx_hash.to_lowercase().as_str())?
      .map(|v| bincode::deserialize::<MarketPlaceTx>(v.value()).unwrap());
    Ok(result)
  }

  fn load_temp_txs(
    &self,
    tick: &str,
    from_block: u64,
    to_block: u64,
  ) -> Result<Vec<TempTx>, Self::Error> {
    if to_block < from_block {
      return Ok(Vec::new());
    }
    let rtx = self.db.begin_read()?;
    let table = rtx.open_table(TEMP_TX)?;
    let start = temp_tx_range_start(tick, from_block);
    let end = temp_tx_range_end(tick, to_block);
    let mut rows = Vec::new();
    for entry in table.range::<&str>(start.as_str()..end.as_str())? {
      let (_, value) = entry?;
      rows.push(bincode::deserialize::<TempTx>(value.value()).unwrap());
    }
    Ok(rows)
  }
}

impl DataStoreReadWrite for DataStore {
  fn insert_inscription_ext(&self, ext: &InscriptionExt) -> Result<(), Self::Error> {
    let wtx = self.db.begin_write()?;
    {
      let mut table = wtx.open_table(INSCRIPTION_EXT)?;
      table.insert(
        ext.tick.to_lowercase().as_str(),
        bincode::serialize(ext).unwrap().as_slice(),
      )?;
    }
    wtx.commit()?;
    Ok(())
  }

  fn update_inscription_ext(&self, ext: &InscriptionExt) -> Result<(), Self::Error> {
    self.insert_inscription_ext(ext)
  }

  fn update_settled_block_number(
    &self,
    tick: &str,
    settled_block_number: u64,
  ) -> Result<(), Self::Error> {
    self.update_inscription_ext_with(tick, |ext| {
      ext.settled_block_number = settled_block_number;
    })
  }

  fn update_progress_mint_finish(&self, tick: &str) -> Result<(), Self::Error> {
    self.update_inscription_ext_with(tick, |ext| {
      ext.progress = 1;
    })
  }

  fn insert_mint_times(
    &self,
    tick: &str,
    mint_times: &HashMap<String, u64>,
  ) -> Result<u64, Self::Error> {
    if mint_times.is_empty() {
      return Ok(0);
    }
    let now = unix_now();
    let wtx = self.db.begin_write()?;
    let mut affected = 0;
    {
      let mut table = wtx.open_table(ADDRESS_MINT_TIMES)?;
      for (address, times) in mint_times {
        let row = AddressMintTimes {
          chain: CHAIN_LITERAL.to_string(),
          protocol: PROTOCOL_LITERAL.to_string(),
          tick: tick.to_lowercase(),
          address: address.to_lowercase(),
          mint_times: *times,
          current_sm_mint_times: 0,
          created_at: now,
          updated_at: now,
        };
        table.insert(
          tick_address_key(tick, address).as_str(),
          bincode::serialize(&row).unwrap().as_slice(),
        )?;
        affected += 1;
      }
    }
    wtx.commit()?;
    Ok(affected)
  }

  fn update_mint_times(
    &self,
    tick: &str,
    mint_times: &HashMap<String, u64>,
  ) -> Result<u64, Self::Error> {
    if mint_times.is_empty() {
      return Ok(0);
    }
    let now = unix_now();
    let wtx = self.db.begin_write()?;
    let mut affected = 0;
    {
      let mut table = wtx.open_table(ADDRESS_MINT_TIMES)?;
      for (address, times) in mint_times {
        let key = tick_address_key(tick, address);
        let existing = table
          .get(key.as_str())?
          .map(|v| bincode::deserialize::<AddressMintTimes>(v.value()).unwrap());
        let Some(mut row) = existing else {
          continue;
        };
        row.mint_times = *times;
        row.updated_at = now;
        table.insert(key.as_str(), bincode::serialize(&row).unwrap().as_slice())?;
        affected += 1;
      }
    }
    wtx.commit()?;
    Ok(affected)
  }

  fn insert_market_tx(&self, mp_tx: &MarketPlaceTx) -> Result<(), Self::Error> {
    let wtx = self.db.begin_write()?;
    {
      let mut table = wtx.open_table(MARKET_PLACE_TX)?;
      table.insert(
        mp_tx.tx_hash.to_lowercase().as_str(),
        bincode::serialize(mp_tx).unwrap().as_slice(),
      )?;
    }
    wtx.commit()?;
    Ok(())
  }

  fn insert_temp_tx(&self, temp_tx: &TempTx) -> Result<(), Self::Error> {
    let wtx = self.db.begin_write()?;
    {
      let mut table = wtx.open_table(TEMP_TX)?;
      table.insert(
        temp_tx_key(
          &temp_tx.tick,
          temp_tx.block_height,
          temp_tx.tx_index,
          &temp_tx.tx_hash,
        )
        .as_str(),
        bincode::serialize(temp_tx).unwrap().as_slice(),
      )?;
    }
    wtx.commit()?;
    Ok(())
  }

  fn delete_temp_txs(
    &self,
    tick: &str,
    from_block: u64,
    to_block: u64,
  ) -> Result<u64, Self::Error> {
    if to_block < from_block {
      return Ok(0);
    }
    let wtx = self.db.begin_write()?;
    let mut removed = 0;
    {
      let mut table = wtx.open_table(TEMP_TX)?;
      let start = temp_tx_range_start(tick, from_block);
      let end = temp_tx_range_end(tick, to_block);
      let mut keys = Vec::new();
      for entry in table.range::<&str>(start.as_str()..end.as_str())? {
        let (key, _) = entry?;
        keys.push(key.value().to_string());
      }
      for key in keys {
        if table.remove(key.as_str())?.is_some() {
          removed += 1;
        }
      }
    }
    wtx.commit()?;
    Ok(removed)
  }
}
