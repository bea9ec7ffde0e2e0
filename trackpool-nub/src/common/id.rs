use std::borrow::Borrow;
use std::fmt::{Debug, Display, Formatter};
use std::ops::Deref;
use std::sync::Arc;

pub trait RsrcId {
  fn of(id: u64) -> Self;
}

macro_rules! rsrc_id {
    (
    $(#[$meta:meta])*
    $x:ident
  ) => {
    $(#[$meta])*
    #[derive(Default, Debug, Copy, Clone, PartialOrd, PartialEq, Ord, Eq, Hash)]
    pub struct $x(pub u64);

    impl RsrcId for $x {
      #[inline]
      fn of(id: u64) -> Self {
        Self(id)
      }
    }

    impl Display for $x {
      fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", stringify!($x), self.0)
      }
    }
  };
}

rsrc_id!(
  /// Pool scoped slot index of a cursor. Stable for the life of the pool.
  CursorId
);
rsrc_id!(
  /// Process unique identity of a cursor pool.
  PoolId
);

impl CursorId {
  #[inline]
  pub fn index(self) -> usize {
    self.0 as usize
  }
}

/// Name of a track. Cheap to clone.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackId(Arc<str>);

impl TrackId {
  pub fn new(name: impl AsRef<str>) -> Self {
    TrackId(Arc::from(name.as_ref()))
  }
}

impl Deref for TrackId {
  type Target = str;
  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl Borrow<str> for TrackId {
  fn borrow(&self) -> &str {
    &self.0
  }
}

impl From<&str> for TrackId {
  fn from(value: &str) -> Self {
    TrackId::new(value)
  }
}

impl From<String> for TrackId {
  fn from(value: String) -> Self {
    TrackId(Arc::from(value))
  }
}

impl Debug for TrackId {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "TrackId({:?})", &*self.0)
  }
}

impl Display for TrackId {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ids_display_with_kind() {
    assert_eq!(CursorId::of(3).to_string(), "CursorId#3");
    assert_eq!(PoolId::of(1).to_string(), "PoolId#1");
    assert_eq!(CursorId::of(7).index(), 7);
  }

  #[test]
  fn track_ids_compare_by_name() {
    let a = TrackId::from("tableTest");
    let b = TrackId::from(String::from("tableTest"));
    assert_eq!(a, b);
    assert_eq!(&*a, "tableTest");
    assert_eq!(format!("{a}"), "tableTest");
  }
}
