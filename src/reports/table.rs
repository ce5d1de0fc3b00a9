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

/// Standard table printer for reports that emit one line per object. Column
/// widths adapt to the widest cell; numeric columns should be right-aligned
/// by index before printing.
pub struct Table {
	column_count: usize,
	rows: Vec<Row>,
	right_align: Vec<bool>, // indicates columns by index
}

enum Row {
	Header(Vec<String>),
	Data(Vec<String>),
	Rule,
	ColumnRule(usize), // a rule under a single column, for totals
}

/// Spacing between adjacent columns.
const GUTTER: usize = 3;

impl Table {
	pub fn new(column_count: usize) -> Self {
		Self {
			column_count,
			rows: Vec::new(),
			right_align: vec![false; column_count],
		}
	}

	/// Specifies columns that should be right-aligned by index.
	pub fn right_align(&mut self, cols: Vec<usize>) {
		for col in cols {
			self.right_align[col] = true;
		}
	}

	pub fn add_header(&mut self, row: Vec<&str>) {
		self.rows.push(Row::Header(
			row.into_iter().map(|s| s.to_string()).collect(),
		));
	}

	pub fn add_row(&mut self, row: Vec<String>) {
		self.rows.push(Row::Data(row));
	}

	/// Adds a full-width separator rule.
	pub fn add_rule(&mut self) {
		self.rows.push(Row::Rule);
	}

	/// Adds a rule spanning only the given column.
	pub fn add_column_rule(&mut self, col: usize) {
		self.rows.push(Row::ColumnRule(col));
	}

	pub fn print(&self) {
		println!();
		let widths = self.column_widths();

		for row in &self.rows {
			match row {
				Row::Header(cells) | Row::Data(cells) => {
					self.print_cells(&widths, cells)
				},
				Row::Rule => {
					let total = widths.iter().sum::<usize>()
						+ GUTTER * (self.column_count - 1);
					println!("{:-<total$}", "");
				},
				Row::ColumnRule(col) => {
					let mut line = String::new();
					for (i, width) in widths.iter().enumerate() {
						if i == *col {
							line.push_str(&"-".repeat(*width));
						} else {
							line.push_str(&" ".repeat(*width));
						}
						if i < self.column_count - 1 {
							line.push_str(&" ".repeat(GUTTER));
						}
					}
					println!("{}", line.trim_end());
				},
			}
		}
	}

	fn column_widths(&self) -> Vec<usize> {
		let mut widths = vec![0; self.column_count];
		for row in &self.rows {
			if let Row::Header(cells) | Row::Data(cells) = row {
				for (i, cell) in cells.iter().enumerate() {
					widths[i] = widths[i].max(cell.len());
				}
			}
		}
		widths
	}

	fn print_cells(&self, widths: &[usize], cells: &[String]) {
		let mut line = String::new();
		for (i, cell) in cells.iter().enumerate() {
			if self.right_align[i] {
				line.push_str(&format!("{:>width$}", cell, width = widths[i]));
			} else {
				line.push_str(&format!("{:<width$}", cell, width = widths[i]));
			}
			if i < cells.len() - 1 {
				line.push_str(&" ".repeat(GUTTER));
			}
		}
		println!("{}", line.trim_end());
	}
}
