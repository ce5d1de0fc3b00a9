/* Copyright © 2024-2025 Adam Train <adam@trainrelay.net>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 */
use rust_decimal::Decimal;
use thiserror::Error;

/// Everything the book can report to a caller. All of these are recoverable
/// and surface synchronously; none is fatal to the process.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum BookError {
	/// Non-positive quantity or price on a purchase, sale, or query
	#[error("quantity and price must be positive")]
	InvalidInput,

	/// Query against a symbol with no recorded position
	#[error("no position for {symbol}")]
	AssetNotFound { symbol: String },

	/// Sale quantity exceeds the total open lot quantity. Also reported
	/// for sales against unknown symbols, which sell from an empty
	/// position.
	#[error(
		"insufficient quantity: requested {requested}, available {available}"
	)]
	InsufficientQuantity {
		requested: Decimal,
		available: Decimal,
	},

	/// A stored lot record that does not describe a valid lot
	#[error("malformed lot record: {reason}")]
	InvalidLotFormat { reason: String },
}
