pub const MAX_MAP_WIDTH: u32 = 64;
pub const MAX_MAP_HEIGHT: u32 = 64;

const MAP_CAPACITY: usize = (MAX_MAP_WIDTH * MAX_MAP_HEIGHT) as usize;

/// Tile grid received from the server. Cell `0` is empty, anything else is a wall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Map {
    width: u32,
    height: u32,
    tiles: Box<[u8; MAP_CAPACITY]>,
}

impl Default for Map {
    fn default() -> Self {
        Self::new()
    }
}

impl Map {
    /// An unloaded 0x0 map. Every lookup is out of bounds.
    pub fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            tiles: Box::new([0; MAP_CAPACITY]),
        }
    }

    /// Empty map of the given size, or `None` past 64x64.
    pub fn with_size(width: u32, height: u32) -> Option<Self> {
        if width > MAX_MAP_WIDTH || height > MAX_MAP_HEIGHT {
            return None;
        }
        Some(Self {
            width,
            height,
            tiles: Box::new([0; MAP_CAPACITY]),
        })
    }

    /// Builds a map from one string per row; `#` is a wall, anything else is empty.
    pub fn from_rows(rows: &[&str]) -> Option<Self> {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        let mut map = Self::with_size(width, height)?;
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.bytes().enumerate() {
                if ch == b'#' {
                    map.set_cell(x as u32, y as u32, 1);
                }
            }
        }
        Some(map)
    }

    /// Expands a row-major bitmap, least significant bit first, one bit per cell.
    pub fn unpack_bits(width: u32, height: u32, bits: &[u8]) -> Option<Self> {
        let mut map = Self::with_size(width, height)?;
        let cells = map.cell_count();
        for (index, tile) in map.tiles[..cells].iter_mut().enumerate() {
            let byte = bits.get(index / 8).copied().unwrap_or(0);
            *tile = (byte >> (index % 8)) & 1;
        }
        Some(map)
    }

    pub fn pack_bits(&self) -> Vec<u8> {
        let cells = self.cell_count();
        let mut bits = vec![0u8; cells.div_ceil(8)];
        for (index, &tile) in self.tiles[..cells].iter().enumerate() {
            if tile != 0 {
                bits[index / 8] |= 1 << (index % 8);
            }
        }
        bits
    }

    /// Bytes needed to carry a `width` x `height` bitmap.
    pub fn packed_len(width: u32, height: u32) -> usize {
        (width as usize * height as usize).div_ceil(8)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_loaded(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn cell_count(&self) -> usize {
        (self.width * self.height) as usize
    }

    /// Cell value at integer coordinates, `None` outside the grid.
    #[inline]
    pub fn cell(&self, x: i32, y: i32) -> Option<u8> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(self.tiles[x as usize + y as usize * self.width as usize])
    }

    pub fn set_cell(&mut self, x: u32, y: u32, value: u8) {
        if x < self.width && y < self.height {
            self.tiles[(x + y * self.width) as usize] = value;
        }
    }
}
