use byteorder::{ByteOrder, NetworkEndian};
use std::convert::TryInto;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use crate::definitions::{
    STUN_ADDRESS_FAMILY_IPV4, STUN_ADDRESS_FAMILY_IPV6, STUN_ADDRESS_HEADER_SIZE,
    STUN_IPV4_ADDRESS_SIZE, STUN_IPV6_ADDRESS_SIZE, STUN_MAGIC_COOKIE_U32,
};
use crate::errors::StunError;

/// [Address attribute value](https://tools.ietf.org/html/rfc5389#section-15.1)
///
/// ```text
/// 0                   1                   2                   3
/// 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |0 0 0 0 0 0 0 0|    Family     |           Port                |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// |                 Address (32 bits or 128 bits)                 |
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// The family is 0x01 for IPv4 (32-bit address) and 0x02 for IPv6 (128-bit
/// address); all fields are in network byte order. The XOR-obfuscated
/// variants (XOR-MAPPED-ADDRESS, XOR-PEER-ADDRESS, XOR-RELAYED-ADDRESS) XOR
/// the port with the most significant 16 bits of the magic cookie and the
/// address with the magic cookie (IPv4) or with the concatenation of the
/// magic cookie and the 96-bit transaction id (IPv6).

/// On-wire size of the attribute value holding `address`.
pub(crate) fn address_value_size(address: &SocketAddr) -> usize {
    STUN_ADDRESS_HEADER_SIZE
        + if address.is_ipv4() {
            STUN_IPV4_ADDRESS_SIZE
        } else {
            STUN_IPV6_ADDRESS_SIZE
        }
}

/// Writes the address value into `value` (which must span exactly
/// [`address_value_size`] bytes), obfuscating a local copy when `is_xor`.
/// The caller's address is left untouched.
pub(crate) fn write_address_value(
    value: &mut [u8],
    address: &SocketAddr,
    transaction_id: &[u8],
    is_xor: bool,
) {
    let wire_addr = if is_xor {
        xor_socket_addr(address, transaction_id)
    } else {
        *address
    };

    value[0] = 0;
    value[1] = if wire_addr.is_ipv4() {
        STUN_ADDRESS_FAMILY_IPV4
    } else {
        STUN_ADDRESS_FAMILY_IPV6
    };
    NetworkEndian::write_u16(&mut value[2..4], wire_addr.port());

    match wire_addr.ip() {
        IpAddr::V4(ip) => value[4..8].copy_from_slice(&ip.octets()),
        IpAddr::V6(ip) => value[4..20].copy_from_slice(&ip.octets()),
    }
}

/// Reads an address attribute value, de-obfuscating when `is_xor`.
///
/// Strict decode: the leading pad byte must be zero and the family must be a
/// known one, otherwise the value is rejected with `BadParam`. A value whose
/// length disagrees with its family is rejected with
/// `InvalidAttributeLength`.
pub(crate) fn read_address_value(
    value: &[u8],
    transaction_id: &[u8],
    is_xor: bool,
) -> Result<SocketAddr, StunError> {
    if value.len() < STUN_ADDRESS_HEADER_SIZE || value[0] != 0 {
        return Err(StunError::BadParam);
    }

    let port = NetworkEndian::read_u16(&value[2..4]);
    let ip_addr = match value[1] {
        STUN_ADDRESS_FAMILY_IPV4 => {
            if value.len() != STUN_ADDRESS_HEADER_SIZE + STUN_IPV4_ADDRESS_SIZE {
                return Err(StunError::InvalidAttributeLength);
            }
            let octets: [u8; 4] = value[4..8].try_into().map_err(|_| StunError::BadParam)?;
            IpAddr::V4(octets.into())
        }
        STUN_ADDRESS_FAMILY_IPV6 => {
            if value.len() != STUN_ADDRESS_HEADER_SIZE + STUN_IPV6_ADDRESS_SIZE {
                return Err(StunError::InvalidAttributeLength);
            }
            let octets: [u8; 16] = value[4..20].try_into().map_err(|_| StunError::BadParam)?;
            IpAddr::V6(octets.into())
        }
        _ => return Err(StunError::BadParam),
    };

    let wire_addr = SocketAddr::new(ip_addr, port);
    Ok(if is_xor {
        xor_socket_addr(&wire_addr, transaction_id)
    } else {
        wire_addr
    })
}

/// Applies the XOR-*-ADDRESS obfuscation. The transform is an involution, so
/// the same function both obfuscates and restores.
pub(crate) fn xor_socket_addr(address: &SocketAddr, transaction_id: &[u8]) -> SocketAddr {
    let port = address.port() ^ (STUN_MAGIC_COOKIE_U32 >> 16) as u16;
    let ip_addr = match address.ip() {
        IpAddr::V4(ip) => xor_v4(ip),
        IpAddr::V6(ip) => xor_v6(ip, transaction_id),
    };

    SocketAddr::new(ip_addr, port)
}

fn xor_v4(address: Ipv4Addr) -> IpAddr {
    let mut octets = address.octets();
    for (i, byte) in octets.iter_mut().enumerate() {
        *byte ^= (STUN_MAGIC_COOKIE_U32 >> (24 - i * 8)) as u8;
    }

    IpAddr::V4(octets.into())
}

fn xor_v6(address: Ipv6Addr, transaction_id: &[u8]) -> IpAddr {
    let mut octets = address.octets();
    for (i, byte) in octets.iter_mut().enumerate().take(4) {
        *byte ^= (STUN_MAGIC_COOKIE_U32 >> (24 - i * 8)) as u8;
    }

    for (i, byte) in octets.iter_mut().enumerate().take(16).skip(4) {
        *byte ^= transaction_id[i - 4];
    }

    IpAddr::V6(octets.into())
}
