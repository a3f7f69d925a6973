use anyhow::{Context, anyhow, bail};
use std::fmt::{Display, Formatter};
use std::net::Ipv4Addr;
use std::str::FromStr;

/// An IPv4 address with a network prefix, in CIDR notation.
///
/// Depending on where it appears, the address part is either the network base
/// (e.g. `192.168.100.0/24` for a subnet) or a concrete interface address that
/// keeps the prefix of the subnet it lives in (e.g. `192.168.100.6/29`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Cidr {
    pub(crate) address: Ipv4Addr,
    pub(crate) network_prefix: u8,
}

impl Ipv4Cidr {
    pub fn new(address: Ipv4Addr, network_prefix: u8) -> anyhow::Result<Self> {
        if network_prefix > 32 {
            bail!("network prefix cannot be higher than 32");
        }

        Ok(Self {
            address,
            network_prefix,
        })
    }

    pub fn address(&self) -> Ipv4Addr {
        self.address
    }

    pub fn network_prefix(&self) -> u8 {
        self.network_prefix
    }

    fn mask(&self) -> u32 {
        u32::MAX
            .checked_shl(32 - self.network_prefix as u32)
            .unwrap_or(0)
    }

    /// The first address of the block (all host bits zero).
    pub fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from_bits(self.address.to_bits() & self.mask())
    }

    /// The last address of the block (all host bits one).
    pub fn broadcast(&self) -> Ipv4Addr {
        Ipv4Addr::from_bits(self.address.to_bits() | !self.mask())
    }

    /// The number of addresses in the block, including network and broadcast.
    pub fn size(&self) -> u64 {
        1u64 << (32 - self.network_prefix as u32)
    }

    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        (self.network().to_bits()..=self.broadcast().to_bits()).contains(&ip.to_bits())
    }

    pub fn overlaps(&self, other: &Ipv4Cidr) -> bool {
        self.contains(other.network()) || other.contains(self.network())
    }

    /// The host address at `offset` from the network base, keeping this
    /// block's prefix. Returns `None` when the offset lands on the network or
    /// broadcast address, or outside the block.
    pub fn host(&self, offset: u32) -> Option<Ipv4Cidr> {
        if offset == 0 || offset as u64 >= self.size() - 1 {
            return None;
        }

        Some(Self {
            address: Ipv4Addr::from_bits(self.network().to_bits() + offset),
            network_prefix: self.network_prefix,
        })
    }

    /// The lowest usable host address of the block.
    pub fn first_host(&self) -> Option<Ipv4Cidr> {
        self.host(1)
    }

    /// The highest usable host address of the block.
    pub fn last_host(&self) -> Option<Ipv4Cidr> {
        self.host(self.size().saturating_sub(2) as u32)
    }

    /// The `index`-th block of `new_prefix` size carved out of this network.
    ///
    /// Returns `None` when the prefix does not fit or the block would extend
    /// beyond the end of this network.
    pub fn nth_subnet(&self, new_prefix: u8, index: u64) -> Option<Ipv4Cidr> {
        if new_prefix < self.network_prefix || new_prefix > 32 {
            return None;
        }

        let block_size = 1u64 << (32 - new_prefix as u32);
        let offset = index.checked_mul(block_size)?;
        if offset + block_size > self.size() {
            return None;
        }

        Some(Self {
            address: Ipv4Addr::from_bits(self.network().to_bits() + offset as u32),
            network_prefix: new_prefix,
        })
    }
}

impl Display for Ipv4Cidr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.address, self.network_prefix)
    }
}

impl FromStr for Ipv4Cidr {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('/');
        let address: Ipv4Addr = parts
            .next()
            .ok_or(anyhow!("empty string"))?
            .parse()
            .context("invalid IPv4 address in CIDR")?;

        // A missing network prefix is interpreted as /32 (i.e. a single address)
        let network_prefix: u8 = parts
            .next()
            .unwrap_or("32")
            .parse()
            .context("the provided network prefix is not a valid unsigned integer")?;
        if network_prefix > 32 {
            bail!("network prefix cannot be higher than 32");
        }

        if parts.next().is_some() {
            bail!("CIDR contains trailing characters");
        }

        Ok(Self {
            address,
            network_prefix,
        })
    }
}
