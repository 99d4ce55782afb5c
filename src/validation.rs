//! Input validation for loaded definition documents

use crate::error::{NetgenError, NetgenResult};

/// Maximum length for interface names (Linux kernel limit is 15)
const MAX_INTERFACE_NAME_LEN: usize = 15;

/// Validate a definition id or rename target as an interface name.
///
/// Interface names must be alphanumeric with optional dashes and underscores,
/// and no longer than 15 characters (Linux kernel limit)
pub fn validate_interface_name(name: &str) -> NetgenResult<()> {
    if name.is_empty() {
        return Err(NetgenError::ConfigError(
            "Interface name cannot be empty".to_string()
        ));
    }

    if name.len() > MAX_INTERFACE_NAME_LEN {
        return Err(NetgenError::ConfigError(
            format!("Interface name '{}' too long (max {} characters)", name, MAX_INTERFACE_NAME_LEN)
        ));
    }

    for c in name.chars() {
        if !c.is_ascii_alphanumeric() && c != '-' && c != '_' && c != '.' {
            return Err(NetgenError::ConfigError(
                format!("Invalid interface name '{}': contains invalid character '{}'", name, c)
            ));
        }
    }

    if name.starts_with('-') {
        return Err(NetgenError::ConfigError(
            "Interface name cannot start with dash".to_string()
        ));
    }

    Ok(())
}

/// Validate MAC address format
///
/// Accepts standard MAC format: XX:XX:XX:XX:XX:XX (hex digits)
pub fn validate_mac_address(mac: &str) -> NetgenResult<()> {
    if mac.len() != 17 {
        return Err(NetgenError::ConfigError(
            "MAC address must be in format XX:XX:XX:XX:XX:XX".to_string()
        ));
    }

    let parts: Vec<&str> = mac.split(':').collect();
    if parts.len() != 6 {
        return Err(NetgenError::ConfigError(
            "MAC address must have 6 octets separated by colons".to_string()
        ));
    }

    for part in parts {
        if part.len() != 2 {
            return Err(NetgenError::ConfigError(
                "Each MAC address octet must be 2 hex digits".to_string()
            ));
        }

        if !part.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(NetgenError::ConfigError(
                format!("Invalid hex digit in MAC address: {}", part)
            ));
        }
    }

    Ok(())
}

/// Validate WiFi SSID
///
/// SSIDs can be 1-32 bytes; control characters would break the keyfile format
pub fn validate_ssid(ssid: &str) -> NetgenResult<()> {
    if ssid.is_empty() {
        return Err(NetgenError::ConfigError(
            "SSID cannot be empty".to_string()
        ));
    }

    if ssid.len() > 32 {
        return Err(NetgenError::ConfigError(
            format!("SSID '{}' cannot exceed 32 bytes", ssid)
        ));
    }

    if ssid.chars().any(|c| c.is_control()) {
        return Err(NetgenError::ConfigError(
            "SSID contains invalid control characters".to_string()
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interface_name_validation() {
        assert!(validate_interface_name("eth0").is_ok());
        assert!(validate_interface_name("wlan0").is_ok());
        assert!(validate_interface_name("br-lan").is_ok());
        assert!(validate_interface_name("veth_test").is_ok());

        assert!(validate_interface_name("").is_err());
        assert!(validate_interface_name("-eth0").is_err());
        assert!(validate_interface_name("verylonginterfacename").is_err());
        assert!(validate_interface_name("eth0; rm -rf /").is_err());
        assert!(validate_interface_name("eth0\nmalicious").is_err());
    }

    #[test]
    fn test_mac_validation() {
        assert!(validate_mac_address("00:11:22:33:44:55").is_ok());
        assert!(validate_mac_address("AA:BB:CC:DD:EE:FF").is_ok());

        assert!(validate_mac_address("00:11:22:33:44").is_err());
        assert!(validate_mac_address("00-11-22-33-44-55").is_err());
        assert!(validate_mac_address("invalid").is_err());
        assert!(validate_mac_address("00:11:22:33:44:GG").is_err());
    }

    #[test]
    fn test_ssid_validation() {
        assert!(validate_ssid("MyNetwork").is_ok());
        assert!(validate_ssid("Test-WiFi_123").is_ok());
        assert!(validate_ssid("Home Wifi").is_ok());

        assert!(validate_ssid("").is_err());
        assert!(validate_ssid("ThisIsAVeryLongSSIDThatExceedsTheMaximumLength").is_err());
        assert!(validate_ssid("SSID\nwith\nnewlines").is_err());
    }
}
