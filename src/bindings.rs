//! Solidity ABI bindings for the ICHI vault factory, the vaults it
//! deploys, and the underlying Uniswap V3 pool price slot.

use alloy::sol;

sol!(
    #![sol(all_derives = true, rpc)]
    contract IICHIVaultFactory {
        event ICHIVaultCreated(
            address indexed sender,
            address ichiVault,
            address tokenA,
            bool allowTokenA,
            address tokenB,
            bool allowTokenB,
            uint24 fee,
            uint256 count
        );
        event OwnershipTransferred(address indexed previousOwner, address indexed newOwner);
    }
);

sol!(
    #![sol(all_derives = true, rpc)]
    contract IICHIVault {
        event Affiliate(address indexed sender, address affiliate);
        event Approval(address indexed owner, address indexed spender, uint256 value);
        event DeployICHIVault(
            address indexed sender,
            address indexed pool,
            bool allowToken0,
            bool allowToken1,
            address owner,
            uint256 twapPeriod
        );
        event Deposit(
            address indexed sender,
            address indexed to,
            uint256 shares,
            uint256 amount0,
            uint256 amount1
        );
        event DepositMax(address indexed sender, uint256 deposit0Max, uint256 deposit1Max);
        event Hysteresis(address indexed sender, uint256 hysteresis);
        event MaxTotalSupply(address indexed sender, uint256 maxTotalSupply);
        event OwnershipTransferred(address indexed previousOwner, address indexed newOwner);
        event Rebalance(
            int24 tick,
            uint256 totalAmount0,
            uint256 totalAmount1,
            uint256 feeAmount0,
            uint256 feeAmount1,
            uint256 totalSupply
        );
        event SetTwapPeriod(address sender, uint32 newTwapPeriod);
        event Transfer(address indexed from, address indexed to, uint256 value);
        event Withdraw(
            address indexed sender,
            address indexed to,
            uint256 shares,
            uint256 amount0,
            uint256 amount1
        );

        function currentTick() external view returns (int24 tick);
        function getTotalAmounts() external view returns (uint256 total0, uint256 total1);
        function totalSupply() external view returns (uint256);
        function pool() external view returns (address);
    }
);

sol!(
    #![sol(all_derives = true, rpc)]
    contract IUniswapV3Pool {
        function slot0()
            external
            view
            returns (
                uint160 sqrtPriceX96,
                int24 tick,
                uint16 observationIndex,
                uint16 observationCardinality,
                uint16 observationCardinalityNext,
                uint8 feeProtocol,
                bool unlocked
            );
    }
);
