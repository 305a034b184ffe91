//! Fixed call and event surfaces of the external contracts.
//!
//! One `sol!` interface per contract shape. These mirror the deployed
//! contracts' ABIs and are assumed stable; only the members the operator
//! uses are listed.

use alloy::sol;

sol! {
    /// Mintable, burnable ERC-20 used as underlying and collateral on test
    /// networks.
    #[sol(all_derives)]
    interface ITestToken {
        function mint(address to, uint256 value) external;
        function burn(address from, uint256 value) external;
        function approve(address spender, uint256 value) external returns (bool);
        function transfer(address to, uint256 value) external returns (bool);
        function balanceOf(address owner) external view returns (uint256);

        event Transfer(address indexed from, address indexed to, uint256 value);
    }

    /// Lending pool token: a proxy whose call surface depends on its
    /// target. Everything but `setTarget` exists only while the proxy
    /// targets the logic implementation.
    #[sol(all_derives)]
    interface ILoanToken {
        function marginTrade(
            bytes32 loanId,
            uint256 leverageAmount,
            uint256 loanTokenSent,
            uint256 collateralTokenSent,
            address collateralTokenAddress,
            address trader,
            bytes calldata loanDataBytes
        ) external payable returns (uint256, uint256);
        function mint(address receiver, uint256 depositAmount) external returns (uint256 mintAmount);
        function burn(address receiver, uint256 burnAmount) external returns (uint256 loanAmountPaid);
        function balanceOf(address owner) external view returns (uint256);
        function loanTokenAddress() external view returns (address);
        function totalAssetSupply() external view returns (uint256);
        function totalAssetBorrow() external view returns (uint256);
        function supplyInterestRate() external view returns (uint256);
        function borrowInterestRate() external view returns (uint256);
        function avgBorrowInterestRate() external view returns (uint256);
        function nextSupplyInterestRate(uint256 supplyAmount) external view returns (uint256);
        function marketLiquidity() external view returns (uint256);
        function tokenPrice() external view returns (uint256);

        function setTarget(address target) external;

        event Mint(address indexed minter, uint256 tokenAmount, uint256 assetAmount, uint256 price);
        event Burn(address indexed burner, uint256 tokenAmount, uint256 assetAmount, uint256 price);
    }

    /// Members that exist only while the pool proxy targets its settings
    /// implementation.
    #[sol(all_derives)]
    interface ILoanTokenSettings {
        function setDemandCurve(
            uint256 baseRate,
            uint256 rateMultiplier,
            uint256 lowUtilBaseRate,
            uint256 lowUtilRateMultiplier
        ) external;
    }

    /// Protocol / liquidation engine.
    #[sol(all_derives)]
    interface IProtocol {
        struct LoanReturnData {
            bytes32 loanId;
            address loanToken;
            address collateralToken;
            uint256 principal;
            uint256 collateral;
            uint256 interestOwedPerDay;
            uint256 interestDepositRemaining;
            uint256 startRate;
            uint256 startMargin;
            uint256 maintenanceMargin;
            uint256 currentMargin;
            uint256 maxLoanTerm;
            uint256 endTimestamp;
            uint256 maxLiquidatable;
            uint256 maxSeizable;
        }

        function getLoan(bytes32 loanId) external view returns (LoanReturnData memory loanData);
        function closeWithSwap(
            bytes32 loanId,
            address receiver,
            uint256 swapAmount,
            bool returnTokenIsCollateral,
            bytes calldata loanDataBytes
        ) external returns (uint256 loanCloseAmount, uint256 withdrawAmount, address withdrawToken);
        function liquidate(bytes32 loanId, address receiver, uint256 closeAmount)
            external payable returns (uint256 loanCloseAmount, uint256 seizedAmount, address seizedToken);
        function lendingFeeTokensHeld(address token) external view returns (uint256);
        function lendingFeePercent() external view returns (uint256);

        event Trade(
            address indexed user,
            address indexed lender,
            bytes32 indexed loanId,
            address collateralToken,
            address loanToken,
            uint256 positionSize,
            uint256 borrowedAmount,
            uint256 interestRate,
            uint256 settlementDate,
            uint256 entryPrice,
            uint256 entryLeverage,
            uint256 currentLeverage
        );
        event CloseWithSwap(
            address indexed user,
            address indexed lender,
            bytes32 indexed loanId,
            address collateralToken,
            address loanToken,
            address closer,
            uint256 positionCloseSize,
            uint256 loanCloseAmount,
            uint256 exitPrice,
            uint256 currentLeverage
        );
        event Liquidate(
            address indexed user,
            address indexed liquidator,
            bytes32 indexed loanId,
            address lender,
            address loanToken,
            address collateralToken,
            uint256 repayAmount,
            uint256 collateralWithdrawAmount,
            uint256 collateralToLoanRate,
            uint256 currentMargin
        );
    }

    /// Price-feed oracle. `setRates` only exists on the local test oracle.
    #[sol(all_derives)]
    interface IPriceFeeds {
        function queryRate(address sourceToken, address destToken)
            external view returns (uint256 rate, uint256 precision);
        function setRates(address sourceToken, address destToken, uint256 rate) external;
    }

    #[sol(all_derives)]
    interface IStaking {
        function balanceOf(address account) external view returns (uint256);
        function setFeeSharing(address feeSharing) external;
    }

    #[sol(all_derives)]
    interface IStakingProxy {
        function setImplementation(address implementation) external;
    }

    #[sol(all_derives)]
    interface IVestingRegistry {
        function createVesting(address tokenOwner, uint256 amount, uint256 cliff, uint256 duration) external;
        function createTeamVesting(address tokenOwner, uint256 amount, uint256 cliff, uint256 duration) external;
        function stakeTokens(address vesting, uint256 amount) external;
        function getVesting(address tokenOwner) external view returns (address);
        function getTeamVesting(address tokenOwner) external view returns (address);

        event VestingCreated(address indexed tokenOwner, address vesting, uint256 cliff, uint256 duration, uint256 amount);
        event TeamVestingCreated(address indexed tokenOwner, address vesting, uint256 cliff, uint256 duration, uint256 amount);
        event TokensStaked(address indexed vesting, uint256 amount);
    }

    #[sol(all_derives)]
    interface IVestingFactory {
        function transferOwnership(address newOwner) external;
    }
}

/// Artifact names deployed by the vesting subsystem setup.
pub mod artifacts {
    pub const TEST_TOKEN: &str = "TestToken";
    pub const SOV: &str = "SOV";
    pub const STAKING: &str = "Staking";
    pub const STAKING_PROXY: &str = "StakingProxy";
    pub const FEE_SHARING_PROXY: &str = "FeeSharingProxy";
    pub const VESTING_FACTORY: &str = "VestingFactory";
    pub const VESTING_REGISTRY: &str = "VestingRegistry";
}
