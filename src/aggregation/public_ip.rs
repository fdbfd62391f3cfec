//! Public IP classification
//!
//! Decides whether a destination address is globally routable. Private,
//! loopback, link-local and other special-purpose ranges are non-public, and
//! so is anything that does not parse as an address.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

pub struct PublicIpClassifier;

impl PublicIpClassifier {
    /// Classify a textual address; unparseable input is non-public
    pub fn is_public(ip: &str) -> bool {
        match IpAddr::from_str(ip.trim()) {
            Ok(addr) => Self::is_public_addr(&addr),
            Err(_) => false,
        }
    }

    pub fn is_public_addr(addr: &IpAddr) -> bool {
        match addr {
            IpAddr::V4(v4) => Self::is_public_v4(v4),
            IpAddr::V6(v6) => Self::is_public_v6(v6),
        }
    }

    fn is_public_v4(ip: &Ipv4Addr) -> bool {
        let [a, b, c, _] = ip.octets();

        let special = ip.is_unspecified()
            || ip.is_private()
            || ip.is_loopback()
            || ip.is_link_local()
            || ip.is_broadcast()
            || ip.is_documentation()
            || ip.is_multicast()
            // 0.0.0.0/8 "this network"
            || a == 0
            // 100.64.0.0/10 carrier-grade NAT
            || (a == 100 && (b & 0xc0) == 64)
            // 192.0.0.0/24 protocol assignments
            || (a == 192 && b == 0 && c == 0)
            // 198.18.0.0/15 benchmarking
            || (a == 198 && (b & 0xfe) == 18)
            // 240.0.0.0/4 reserved
            || a >= 240;

        !special
    }

    fn is_public_v6(ip: &Ipv6Addr) -> bool {
        if let Some(v4) = ip.to_ipv4_mapped() {
            return Self::is_public_v4(&v4);
        }

        let segments = ip.segments();
        let special = ip.is_unspecified()
            || ip.is_loopback()
            || ip.is_multicast()
            // fc00::/7 unique local
            || (segments[0] & 0xfe00) == 0xfc00
            // fe80::/10 link-local
            || (segments[0] & 0xffc0) == 0xfe80
            // 2001:db8::/32 documentation
            || (segments[0] == 0x2001 && segments[1] == 0x0db8)
            // 64:ff9b:1::/48 local-use translation, 100::/64 discard
            || (segments[0] == 0x0064 && segments[1] == 0xff9b && segments[2] == 0x0001)
            || (segments[0] == 0x0100 && segments[1..4] == [0, 0, 0]);

        !special
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_v4() {
        assert!(PublicIpClassifier::is_public("8.8.8.8"));
        assert!(PublicIpClassifier::is_public("1.1.1.1"));
        assert!(PublicIpClassifier::is_public("172.32.0.1"));
        assert!(PublicIpClassifier::is_public(" 9.9.9.9 "));
    }

    #[test]
    fn test_private_v4() {
        assert!(!PublicIpClassifier::is_public("10.0.0.5"));
        assert!(!PublicIpClassifier::is_public("192.168.1.1"));
        assert!(!PublicIpClassifier::is_public("172.16.4.4"));
        assert!(!PublicIpClassifier::is_public("127.0.0.1"));
        assert!(!PublicIpClassifier::is_public("169.254.10.1"));
        assert!(!PublicIpClassifier::is_public("0.0.0.0"));
        assert!(!PublicIpClassifier::is_public("255.255.255.255"));
    }

    #[test]
    fn test_special_purpose_v4() {
        assert!(!PublicIpClassifier::is_public("100.64.1.1"));
        assert!(PublicIpClassifier::is_public("100.128.0.1"));
        assert!(!PublicIpClassifier::is_public("198.18.0.1"));
        assert!(!PublicIpClassifier::is_public("203.0.113.5"));
        assert!(!PublicIpClassifier::is_public("224.0.0.251"));
        assert!(!PublicIpClassifier::is_public("240.0.0.1"));
    }

    #[test]
    fn test_v6() {
        assert!(PublicIpClassifier::is_public("2606:4700:4700::1111"));
        assert!(!PublicIpClassifier::is_public("::1"));
        assert!(!PublicIpClassifier::is_public("fe80::1"));
        assert!(!PublicIpClassifier::is_public("fd12:3456::1"));
        assert!(!PublicIpClassifier::is_public("2001:db8::1"));
        assert!(!PublicIpClassifier::is_public("::ffff:192.168.1.1"));
        assert!(PublicIpClassifier::is_public("::ffff:8.8.8.8"));
    }

    #[test]
    fn test_unparseable_is_not_public() {
        assert!(!PublicIpClassifier::is_public("not-an-ip"));
        assert!(!PublicIpClassifier::is_public(""));
        assert!(!PublicIpClassifier::is_public("8.8.8.8."));
        assert!(!PublicIpClassifier::is_public("999.1.1.1"));
    }
}
