//! Contract bindings.

use ethers::contract::abigen;

abigen!(
    TokenContract,
    r#"[
        function balanceOf(address account) external view returns (uint256)
    ]"#
);

abigen!(
    FaucetContract,
    r#"[
        function disburse(address recipient) external
    ]"#
);
