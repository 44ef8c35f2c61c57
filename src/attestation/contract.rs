//! Ethereum Attestation Service ABI subset.

use alloy::sol;

sol! {
    /// The attest entry point and the event it emits.
    #[derive(Debug, PartialEq, Eq)]
    interface IEAS {
        struct AttestationRequestData {
            address recipient;
            uint64 expirationTime;
            bool revocable;
            bytes32 refUID;
            bytes data;
            uint256 value;
        }

        struct AttestationRequest {
            bytes32 schema;
            AttestationRequestData data;
        }

        function attest(AttestationRequest calldata request) external payable returns (bytes32);

        event Attested(address indexed recipient, address indexed attester, bytes32 uid, bytes32 indexed schemaUID);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::sol_types::{SolCall, SolEvent};

    #[test]
    fn test_selectors_match_deployed_contract() {
        // attest((bytes32,(address,uint64,bool,bytes32,bytes,uint256)))
        assert_eq!(IEAS::attestCall::SELECTOR, [0xf1, 0x73, 0x25, 0xe7]);
        assert_eq!(
            IEAS::Attested::SIGNATURE,
            "Attested(address,address,bytes32,bytes32)"
        );
        assert_eq!(
            IEAS::Attested::SIGNATURE_HASH.to_string(),
            "0x8bf46bf4cfd674fa735a3d63ec1c9ad4153f033c290341f3a588b75685141b35"
        );
    }
}
