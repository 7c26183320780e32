//! Frame stripping: Ethernet → IPv4 → UDP → DNS message bytes.

use pnet::packet::ethernet::{EtherTypes, EthernetPacket};
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::packet::ipv4::Ipv4Packet;
use pnet::packet::udp::UdpPacket;
use pnet::packet::Packet;

pub const DNS_PORT: u16 = 53;

const UDP_HEADER_LEN: usize = 8;

/// Extracts the DNS message carried by a captured Ethernet frame.
///
/// Returns `None` for anything that is not IPv4/UDP with port 53 on
/// either end, and for frames whose UDP length field disagrees with the
/// bytes actually captured. The payload is trimmed to the UDP length so
/// Ethernet padding never reaches the parser.
pub fn dns_payload(frame: &[u8]) -> Option<Vec<u8>> {
    let ethernet = EthernetPacket::new(frame)?;
    if ethernet.get_ethertype() != EtherTypes::Ipv4 {
        return None;
    }

    let ipv4 = Ipv4Packet::new(ethernet.payload())?;
    if ipv4.get_next_level_protocol() != IpNextHeaderProtocols::Udp {
        return None;
    }

    let udp = UdpPacket::new(ipv4.payload())?;
    if udp.get_source() != DNS_PORT && udp.get_destination() != DNS_PORT {
        return None;
    }

    let dns_len = (udp.get_length() as usize).checked_sub(UDP_HEADER_LEN)?;
    let payload = udp.payload();
    if dns_len > payload.len() {
        return None;
    }

    Some(payload[..dns_len].to_vec())
}
