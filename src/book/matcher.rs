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
use crate::book::error::BookError;
use crate::book::lot::Lot;
use crate::book::position::Position;
use rust_decimal::Decimal;

/// Matches a sale against a position's lots, oldest settlement date first,
/// and reports the realized gain or loss across everything consumed.
///
/// Lots are consumed in ascending settlement-date order; lots settled on
/// the same date are consumed in the order they were recorded. A lot larger
/// than what remains of the sale is split, shrinking in place; smaller lots
/// are consumed whole. Realized gain/loss accumulates per fragment as
/// `(unit_price - lot.unit_price) * drawn` and may be negative.
///
/// Works against a copy of the position. On any error the caller's state is
/// untouched; no partial consumption ever escapes. On success the returned
/// position contains the surviving lots with exhausted ones filtered out.
///
/// The requested quantity must be positive; that is the caller's contract,
/// and this panics rather than reporting a `BookError` if it is violated.
pub fn match_sale(
	position: &Position,
	quantity: Decimal,
	unit_price: Decimal,
) -> Result<(Position, Decimal), BookError> {
	assert!(
		quantity > Decimal::ZERO,
		"sale quantity must be positive; callers validate input first"
	);

	let mut lots: Vec<Lot> = position.lots().to_vec();
	for lot in &lots {
		lot.validate()?;
	}

	// Stable, so equal dates keep their recorded order
	lots.sort_by_key(|lot| lot.settle_date);

	let mut remaining = quantity;
	let mut realized = Decimal::ZERO;

	for lot in &mut lots {
		if remaining.is_zero() {
			break;
		}

		let drawn = remaining.min(lot.quantity);
		realized += (unit_price - lot.unit_price) * drawn;
		lot.quantity -= drawn;
		remaining -= drawn;
	}

	if remaining > Decimal::ZERO {
		return Err(BookError::InsufficientQuantity {
			requested: quantity,
			available: position.quantity(),
		});
	}

	let survivors: Vec<Lot> =
		lots.into_iter().filter(|lot| !lot.is_exhausted()).collect();

	Ok((Position::from(survivors), realized))
}
